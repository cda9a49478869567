use tracing::debug;

use crate::{
    color::{Rgb, Rgba},
    compositor::{adjust, composite, extend, BlendMode, Brush, Geometry, ImageBuffer, Layer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{Ellipse, Insets, Point, RectF},
    styles::{
        ring::{self, DropShadow},
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
    texture,
};

use super::{paper_margins, PAPER, TABLE_MARGIN};

const WARMTH: f32 = 0.6;
const SATURATION: f32 = 0.92;
const LIFT: f32 = 1.04;
const AGED_EDGE: Rgb = Rgb::new(120, 80, 40);
const MOTTLE_ALPHA: u8 = 20;
const SEAM_DEPTH: f32 = 4.0;
const TABLE: Rgb = Rgb::new(235, 235, 232);

/// Instant-film print
pub struct PolaroidStyle;

impl PolaroidStyle {
    pub fn new() -> Self {
        Self
    }

    /// Warm brown darkening toward the corners of the print
    fn aged_edges(width: u32, height: u32) -> VectorOverlay {
        let area = RectF::canvas(width, height);
        VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(area),
            Brush::radial(
                Ellipse::covering(area, 1.0),
                vec![
                    Stop::new(0.0, Rgba::TRANSPARENT),
                    Stop::new(0.6, Rgba::TRANSPARENT),
                    Stop::new(1.0, AGED_EDGE.with_opacity(0.25)),
                ],
            ),
        ))
    }

    /// Shallow shade where the paper overlaps the photo on each edge
    fn seams(photo: RectF) -> VectorOverlay {
        let shade = |from: Point, to: Point| Brush::Linear {
            start: from,
            end: to,
            stops: vec![Stop::new(0.0, Rgb::BLACK.with_opacity(0.12)), Stop::new(1.0, Rgba::TRANSPARENT)],
        };
        let (x, y, w, h) = (photo.x, photo.y, photo.width, photo.height);
        let (r, b) = (photo.right(), photo.bottom());

        VectorOverlay::from_shapes(vec![
            Shape::fill(Geometry::Rect(RectF::new(x, y, w, SEAM_DEPTH)), shade(Point::new(x, y), Point::new(x, y + SEAM_DEPTH))),
            Shape::fill(Geometry::Rect(RectF::new(x, y, SEAM_DEPTH, h)), shade(Point::new(x, y), Point::new(x + SEAM_DEPTH, y))),
            Shape::fill(
                Geometry::Rect(RectF::new(x, b - SEAM_DEPTH, w, SEAM_DEPTH)),
                shade(Point::new(x, b), Point::new(x, b - SEAM_DEPTH)),
            ),
            Shape::fill(
                Geometry::Rect(RectF::new(r - SEAM_DEPTH, y, SEAM_DEPTH, h)),
                shade(Point::new(r, y), Point::new(r - SEAM_DEPTH, y)),
            ),
        ])
    }
}

impl Default for PolaroidStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for PolaroidStyle {
    fn name(&self) -> &str {
        "polaroid"
    }

    fn description(&self) -> &str {
        "Instant-film print with warm fade, paper mount and table shadow"
    }

    fn apply(&self, image: ImageBuffer, _params: &FrameParams, ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let (w, h) = image.dimensions();
        let (side, bottom) = paper_margins(w);
        debug!("Applying polaroid with {}px sides and {}px chin", side, bottom);

        let toned = adjust::brightness(adjust::saturate(adjust::warm_tone(image, WARMTH), SATURATION), LIFT);
        let mottle = texture::turbulence_field(w, h, MOTTLE_ALPHA, ctx.rng())?;
        let aged = composite(
            toned,
            [
                Layer::vector(Self::aged_edges(w, h)),
                Layer::raster(mottle).blend(BlendMode::Overlay),
            ],
        )?;

        let print = extend(aged, Insets { top: side, right: side, bottom, left: side }, PAPER.opaque())?;
        let photo = RectF::new(side as f32, side as f32, w as f32, h as f32);
        let print = composite(print, [Layer::vector(Self::seams(photo))])?;

        ring::mount(
            print,
            &DropShadow {
                margin: TABLE_MARGIN,
                offset_x: 0.0,
                offset_y: 6.0,
                sigma: 10.0,
                opacity: 0.28,
                surface: TABLE,
            },
        )
    }

    fn supplies_own_tint(&self) -> bool {
        true
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.5,
            procedural: true,
            growth: CanvasGrowth::Variable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn apply(w: u32, h: u32) -> ImageBuffer {
        let photo = ImageBuffer::filled(w, h, Rgb::new(120, 140, 160).opaque()).unwrap();
        PolaroidStyle::new()
            .apply(photo, &FrameParams::new(Rgb::BLACK), &mut StyleContext::new(SmallRng::seed_from_u64(2)))
            .unwrap()
    }

    #[test]
    fn test_paper_margins() {
        assert_eq!(paper_margins(100), (16, 56));
        assert_eq!(paper_margins(1000), (60, 210));
    }

    #[test]
    fn test_polaroid_dimensions() {
        let out = apply(100, 100);
        let (side, bottom) = paper_margins(100);
        assert_eq!(
            out.dimensions(),
            (100 + 2 * side + 2 * TABLE_MARGIN, 100 + side + bottom + 2 * TABLE_MARGIN)
        );
    }

    #[test]
    fn test_chin_is_paper() {
        let out = apply(100, 100);
        let (side, bottom) = paper_margins(100);
        let chin = out.pixel(out.width() / 2, TABLE_MARGIN + side + 100 + bottom / 2).unwrap();
        assert_eq!(chin, PAPER.opaque());
    }

    #[test]
    fn test_photo_warmed() {
        let out = apply(100, 100);
        let (side, _) = paper_margins(100);
        let center = out.pixel(TABLE_MARGIN + side + 50, TABLE_MARGIN + side + 50).unwrap();
        assert!(center.r > 120, "red should rise: {center:?}");
        assert!(center.b < 170, "blue should not rise much: {center:?}");
    }
}
