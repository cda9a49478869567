use tracing::debug;

use crate::{
    color::Rgb,
    compositor::{adjust, composite, extend, BlendMode, Brush, Geometry, ImageBuffer, Layer, Shape, VectorOverlay},
    error::Result,
    geometry::{Insets, RectF},
    styles::{
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
    texture,
};

use super::{
    hole_count, GRAIN_ALPHA, HOLE_COLOR, HOLE_GAP, HOLE_HEIGHT, HOLE_TOP, HOLE_WIDTH, RAIL_WIDTH, STRIP_HEIGHT,
};

const FILM_SATURATION: f32 = 0.88;
const WARM_CAST: Rgb = Rgb::new(160, 120, 60);
const WARM_CAST_OPACITY: f32 = 0.12;

/// 35mm film frame
pub struct FilmstripStyle;

impl FilmstripStyle {
    pub fn new() -> Self {
        Self
    }

    /// One black strip at `top` with its sprocket holes cut out
    fn strip(width: u32, top: f32) -> Geometry {
        let count = hole_count(width);
        let pitch = HOLE_WIDTH + HOLE_GAP;
        let span = count as f32 * pitch - HOLE_GAP;
        let start = ((width as f32 - span) / 2.0).round();

        let mut parts = vec![Geometry::Rect(RectF::new(0.0, top, width as f32, STRIP_HEIGHT as f32))];
        parts.extend((0..count).map(|i| {
            Geometry::Rect(RectF::new(start + i as f32 * pitch, top + HOLE_TOP, HOLE_WIDTH, HOLE_HEIGHT))
        }));
        Geometry::Compound(parts)
    }

    fn film_base(width: u32, height: u32) -> VectorOverlay {
        let black = || Brush::Solid(Rgb::BLACK.opaque());
        let rail_height = (height - 2 * STRIP_HEIGHT) as f32;
        let strip_top = STRIP_HEIGHT as f32;

        VectorOverlay::from_shapes(vec![
            Shape::fill(Self::strip(width, 0.0), black()),
            Shape::fill(Self::strip(width, (height - STRIP_HEIGHT) as f32), black()),
            Shape::fill(Geometry::Rect(RectF::new(0.0, strip_top, RAIL_WIDTH as f32, rail_height)), black()),
            Shape::fill(
                Geometry::Rect(RectF::new((width - RAIL_WIDTH) as f32, strip_top, RAIL_WIDTH as f32, rail_height)),
                black(),
            ),
        ])
    }
}

impl Default for FilmstripStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for FilmstripStyle {
    fn name(&self) -> &str {
        "filmstrip"
    }

    fn description(&self) -> &str {
        "35mm film frame with sprocket holes, grain, scratches and light leaks"
    }

    fn apply(&self, image: ImageBuffer, _params: &FrameParams, ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let toned = adjust::saturate(image, FILM_SATURATION);
        let canvas = extend(toned, Insets::symmetric(STRIP_HEIGHT, RAIL_WIDTH), HOLE_COLOR.opaque())?;
        let (width, height) = canvas.dimensions();
        debug!("Applying filmstrip at {}x{} with {} holes per strip", width, height, hole_count(width));

        let grain = texture::grain_field(width, height, GRAIN_ALPHA, ctx.rng())?;
        let cast = VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(RectF::canvas(width, height)),
            Brush::Solid(WARM_CAST.opaque()),
        ));

        composite(
            canvas,
            [
                Layer::vector(Self::film_base(width, height)),
                Layer::raster(grain).blend(BlendMode::Overlay),
                Layer::vector(texture::scratch_layer(width, height)).blend(BlendMode::Screen),
                Layer::vector(texture::light_leaks(width, height)).blend(BlendMode::Screen),
                Layer::vector(texture::film_burns(width, height)).blend(BlendMode::Screen),
                Layer::vector(cast).blend(BlendMode::Multiply).opacity(WARM_CAST_OPACITY),
            ],
        )
    }

    fn supplies_own_tint(&self) -> bool {
        true
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.7,
            procedural: true,
            growth: CanvasGrowth::Variable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn apply(w: u32, h: u32, seed: u64) -> ImageBuffer {
        let photo = ImageBuffer::filled(w, h, Rgb::new(90, 140, 200).opaque()).unwrap();
        FilmstripStyle::new()
            .apply(photo, &FrameParams::new(Rgb::BLACK), &mut StyleContext::new(SmallRng::seed_from_u64(seed)))
            .unwrap()
    }

    #[test]
    fn test_hole_count() {
        assert_eq!(hole_count(232), 14);
        assert_eq!(hole_count(24), 1);
        assert_eq!(hole_count(8), 0);
    }

    #[test]
    fn test_filmstrip_dimensions() {
        let out = apply(200, 150, 1);
        assert_eq!(out.dimensions(), (232, 198));
    }

    #[test]
    fn test_holes_brighter_than_strip() {
        let out = apply(200, 150, 1);
        let width = out.width();
        let count = hole_count(width);
        let span = count as f32 * 16.0 - 8.0;
        let start = ((width as f32 - span) / 2.0).round() as u32;
        let middle = start + (count / 2) * 16;

        let hole = out.pixel(middle + 4, 12).unwrap().rgb().luminance();
        let film = out.pixel(middle + 12, 3).unwrap().rgb().luminance();
        assert!(hole > film + 60.0, "hole {hole} film {film}");
    }

    #[test]
    fn test_grain_follows_seed() {
        let a = apply(64, 48, 3);
        let b = apply(64, 48, 3);
        let c = apply(64, 48, 4);
        assert_eq!(a.pixmap().data(), b.pixmap().data());
        assert_ne!(a.pixmap().data(), c.pixmap().data());
    }
}
