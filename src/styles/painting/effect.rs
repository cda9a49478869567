use tracing::debug;

use crate::{
    color::{Rgb, Rgba},
    compositor::{composite, extend, BlendMode, Brush, Geometry, ImageBuffer, Layer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{Insets, Point, RectF},
    styles::{
        ring::{self, Band},
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
    texture,
};

use super::{CLASSIC_DEPTH, GRAIN_LINES, MAT_WIDTH, WOODEN_DEPTH};

const IVORY: Rgb = Rgb::new(0xF5, 0xF0, 0xE1);
const MAT_LINE: Rgb = Rgb::new(0xD8, 0xCF, 0xB8);

const ANTIQUE_BACKING: Rgb = Rgb::new(61, 50, 26);
const ANTIQUE_DARK: Rgb = Rgb::new(0x5c, 0x4a, 0x1a);
const ANTIQUE_MID_DARK: Rgb = Rgb::new(0x7d, 0x65, 0x10);
const ANTIQUE_MID: Rgb = Rgb::new(0xa6, 0x7c, 0x32);
const ANTIQUE_MID_LIGHT: Rgb = Rgb::new(0xc9, 0xa2, 0x27);
const ANTIQUE_LIGHT: Rgb = Rgb::new(0xe8, 0xc5, 0x47);
const ANTIQUE_HIGHLIGHT: Rgb = Rgb::new(0xf5, 0xe6, 0xa8);
const ANTIQUE_RABBET: Rgb = Rgb::new(0x3d, 0x32, 0x08);

const WOOD_BACKING: Rgb = Rgb::new(42, 26, 15);
const WOOD_DARK: Rgb = Rgb::new(0x3d, 0x28, 0x17);
const WOOD_MID_DARK: Rgb = Rgb::new(0x5c, 0x3d, 0x2e);
const WOOD_MID: Rgb = Rgb::new(0x7d, 0x5a, 0x3a);
const WOOD_MID_LIGHT: Rgb = Rgb::new(0xa6, 0x7c, 0x52);
const WOOD_LIGHT: Rgb = Rgb::new(0xc4, 0x9a, 0x6c);
const WOOD_HIGHLIGHT: Rgb = Rgb::new(0xd4, 0xa5, 0x74);
const WOOD_RABBET: Rgb = Rgb::new(0x2a, 0x1a, 0x0f);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintingKind {
    Classic,
    Wooden,
}

impl PaintingKind {
    /// Moulding bands from outer edge to rabbet
    fn bands(&self) -> Vec<Band> {
        match self {
            PaintingKind::Classic => vec![
                Band::sweep(4.0, &[ANTIQUE_DARK, ANTIQUE_MID_DARK]),
                Band::sweep(18.0, &[ANTIQUE_MID, ANTIQUE_LIGHT, ANTIQUE_HIGHLIGHT, ANTIQUE_MID_LIGHT, ANTIQUE_MID]),
                Band::flat(2.0, ANTIQUE_MID_DARK),
                Band::sweep(8.0, &[ANTIQUE_MID_LIGHT, ANTIQUE_LIGHT, ANTIQUE_MID]),
                Band::flat(2.0, ANTIQUE_DARK),
                Band::flat(1.0, ANTIQUE_RABBET),
            ],
            PaintingKind::Wooden => vec![
                Band::sweep(5.0, &[WOOD_DARK, WOOD_MID_DARK]),
                Band::sweep(4.0, &[WOOD_MID, WOOD_MID_LIGHT]),
                Band::sweep(6.0, &[WOOD_LIGHT, WOOD_HIGHLIGHT, WOOD_MID_LIGHT]),
                Band::sweep(8.0, &[WOOD_MID_LIGHT, WOOD_MID, WOOD_MID_DARK]),
                Band::flat(1.0, WOOD_RABBET),
            ],
        }
    }

    fn depth(&self) -> u32 {
        match self {
            PaintingKind::Classic => CLASSIC_DEPTH,
            PaintingKind::Wooden => WOODEN_DEPTH,
        }
    }

    fn backing(&self) -> Rgb {
        match self {
            PaintingKind::Classic => ANTIQUE_BACKING,
            PaintingKind::Wooden => WOOD_BACKING,
        }
    }
}

/// Gallery moulding around the photo
pub struct PaintingStyle {
    kind: PaintingKind,
}

impl PaintingStyle {
    pub fn new(kind: PaintingKind) -> Self {
        Self { kind }
    }

    /// Diagonal sheen as if the print sat behind glass
    fn glass_reflection(width: u32, height: u32) -> VectorOverlay {
        let area = RectF::canvas(width, height);
        VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(area),
            Brush::Linear {
                start: Point::new(0.0, 0.0),
                end: Point::new(area.width, area.height),
                stops: vec![
                    Stop::new(0.0, Rgb::WHITE.with_opacity(0.12)),
                    Stop::new(0.35, Rgb::WHITE.with_opacity(0.04)),
                    Stop::new(0.5, Rgba::TRANSPARENT),
                ],
            },
        ))
    }

    /// Photo behind glass on an ivory mat with a pencil line at its inner edge
    fn matted(image: ImageBuffer) -> Result<ImageBuffer> {
        let (w, h) = image.dimensions();
        let glazed = composite(
            image,
            [Layer::vector(Self::glass_reflection(w, h)).blend(BlendMode::Screen)],
        )?;

        let matted = extend(glazed, Insets::uniform(MAT_WIDTH), IVORY.opaque())?;
        let photo = RectF::new(MAT_WIDTH as f32, MAT_WIDTH as f32, w as f32, h as f32);
        let line = VectorOverlay::new().with_shape(Shape::stroke(
            Geometry::Rect(photo.inset(-1.5)),
            Brush::Solid(MAT_LINE.opaque()),
            1.0,
        ));
        composite(matted, [Layer::vector(line)])
    }
}

impl Style for PaintingStyle {
    fn name(&self) -> &str {
        match self.kind {
            PaintingKind::Classic => "classic",
            PaintingKind::Wooden => "wooden",
        }
    }

    fn description(&self) -> &str {
        match self.kind {
            PaintingKind::Classic => "Antique gold moulding with ivory mat and glass sheen",
            PaintingKind::Wooden => "Carved walnut moulding with procedural grain",
        }
    }

    fn apply(&self, image: ImageBuffer, _params: &FrameParams, ctx: &mut StyleContext) -> Result<ImageBuffer> {
        debug!("Applying {} frame", self.name());

        let image = match self.kind {
            PaintingKind::Classic => Self::matted(image)?,
            PaintingKind::Wooden => image,
        };

        let depth = self.kind.depth();
        let framed = extend(image, Insets::uniform(depth), self.kind.backing().opaque())?;
        let (width, height) = framed.dimensions();
        let outer = RectF::canvas(width, height);
        let inner = outer.inset(depth as f32);

        let mut layers = vec![Layer::vector(VectorOverlay::from_shapes(ring::band_stack(outer, &self.kind.bands())))];

        if self.kind == PaintingKind::Wooden {
            layers.push(Layer::vector(texture::wood_grain(
                outer,
                inner,
                GRAIN_LINES,
                WOOD_RABBET,
                ctx.rng(),
            )));
        }

        let mut details = ring::miter_seams(outer, depth as f32, Rgb::BLACK.with_opacity(0.35), 1.0);
        details.extend(ring::inner_bevel(inner, 5.0, 2.0));
        layers.push(Layer::vector(VectorOverlay::from_shapes(details)));

        composite(framed, layers)
    }

    fn metadata(&self) -> StyleMetadata {
        let growth = match self.kind {
            PaintingKind::Classic => CanvasGrowth::Uniform(MAT_WIDTH + CLASSIC_DEPTH),
            PaintingKind::Wooden => CanvasGrowth::Uniform(WOODEN_DEPTH),
        };
        StyleMetadata {
            performance_impact: 0.3,
            procedural: self.kind == PaintingKind::Wooden,
            growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::ring::stack_depth;
    use rand::{rngs::SmallRng, SeedableRng};

    fn apply(kind: PaintingKind, seed: u64) -> ImageBuffer {
        let photo = ImageBuffer::filled(100, 80, Rgb::new(30, 90, 160).opaque()).unwrap();
        PaintingStyle::new(kind)
            .apply(photo, &FrameParams::new(Rgb::BLACK), &mut StyleContext::new(SmallRng::seed_from_u64(seed)))
            .unwrap()
    }

    #[test]
    fn test_band_stacks_fill_moulding() {
        assert_eq!(stack_depth(&PaintingKind::Classic.bands()), CLASSIC_DEPTH as f32);
        assert_eq!(stack_depth(&PaintingKind::Wooden.bands()), WOODEN_DEPTH as f32);
    }

    #[test]
    fn test_classic_has_mat_and_moulding() {
        let out = apply(PaintingKind::Classic, 1);
        let grow = 2 * (MAT_WIDTH + CLASSIC_DEPTH);
        assert_eq!(out.dimensions(), (100 + grow, 80 + grow));

        let mat = out.pixel(CLASSIC_DEPTH + 8, out.height() / 2).unwrap();
        assert_eq!(mat, IVORY.opaque());

        let moulding = out.pixel(10, out.height() / 2).unwrap();
        assert_ne!(moulding.rgb(), IVORY);
        assert_eq!(moulding.a, 255);
    }

    #[test]
    fn test_classic_glass_brightens_top_left() {
        let out = apply(PaintingKind::Classic, 1);
        let offset = MAT_WIDTH + CLASSIC_DEPTH;
        let top_left = out.pixel(offset + 6, offset + 6).unwrap();
        let bottom_right = out.pixel(offset + 94, offset + 74).unwrap();
        assert!(top_left.rgb().luminance() > bottom_right.rgb().luminance());
    }

    #[test]
    fn test_wooden_grain_follows_seed() {
        let a = apply(PaintingKind::Wooden, 5);
        let b = apply(PaintingKind::Wooden, 5);
        let c = apply(PaintingKind::Wooden, 6);
        assert_eq!(a.dimensions(), (100 + 2 * WOODEN_DEPTH, 80 + 2 * WOODEN_DEPTH));
        assert_eq!(a.pixmap().data(), b.pixmap().data());
        assert_ne!(a.pixmap().data(), c.pixmap().data());
    }
}
