use tracing::debug;

use crate::{
    color::Rgb,
    compositor::{composite, extend, BlendMode, Brush, Geometry, ImageBuffer, Layer, Shape, VectorOverlay},
    error::Result,
    geometry::{Insets, RectF},
    styles::{
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
};

use super::{
    CORNER_RADIUS_FACTOR, DOUBLE_GAP, DOUBLE_LINE_WIDTH, DOUBLE_OUTER_INSET, DOUBLE_PAD, MAX_CORNER_RADIUS,
    ROUNDED_PAD, ROUNDED_RADIUS, SOLID_PAD, THICK_PAD, THIN_PAD,
};

/// Which flat border to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderVariant {
    Thin,
    Solid,
    Thick,
    Double,
    Rounded,
}

impl BorderVariant {
    /// Padding added to every side
    pub fn pad(&self) -> u32 {
        match self {
            BorderVariant::Thin => THIN_PAD,
            BorderVariant::Solid => SOLID_PAD,
            BorderVariant::Thick => THICK_PAD,
            BorderVariant::Double => DOUBLE_PAD,
            BorderVariant::Rounded => ROUNDED_PAD,
        }
    }

    /// Radius of the destination-in corner mask, if any
    fn corner_radius(&self) -> Option<f32> {
        match self {
            BorderVariant::Thin | BorderVariant::Solid | BorderVariant::Thick => {
                Some((CORNER_RADIUS_FACTOR * self.pad() as f32).round().min(MAX_CORNER_RADIUS))
            }
            BorderVariant::Rounded => Some(ROUNDED_RADIUS),
            BorderVariant::Double => None,
        }
    }
}

/// Flat padded borders
pub struct BorderStyle {
    variant: BorderVariant,
}

impl BorderStyle {
    pub fn new(variant: BorderVariant) -> Self {
        Self { variant }
    }

    /// Two unfilled rectangles in the frame color, separated by a gap
    fn double_rules(&self, width: u32, height: u32, color: Rgb) -> VectorOverlay {
        let canvas = RectF::canvas(width, height);
        let half = DOUBLE_LINE_WIDTH / 2.0;
        let outer = canvas.inset(DOUBLE_OUTER_INSET + half);
        let inner = canvas.inset(DOUBLE_OUTER_INSET + DOUBLE_LINE_WIDTH + DOUBLE_GAP + half);

        VectorOverlay::from_shapes(
            [outer, inner]
                .into_iter()
                .map(|rect| Shape::stroke(Geometry::Rect(rect), Brush::Solid(color.opaque()), DOUBLE_LINE_WIDTH))
                .collect(),
        )
    }
}

impl Style for BorderStyle {
    fn name(&self) -> &str {
        match self.variant {
            BorderVariant::Thin => "thin",
            BorderVariant::Solid => "solid",
            BorderVariant::Thick => "thick",
            BorderVariant::Double => "double",
            BorderVariant::Rounded => "rounded",
        }
    }

    fn description(&self) -> &str {
        match self.variant {
            BorderVariant::Thin => "Hairline border in the brand color",
            BorderVariant::Solid => "Solid border in the brand color with softened corners",
            BorderVariant::Thick => "Heavy border in the brand color",
            BorderVariant::Double => "White mat with two thin rules in the brand color",
            BorderVariant::Rounded => "Border in the brand color with strongly rounded corners",
        }
    }

    fn apply(&self, image: ImageBuffer, params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let pad = self.variant.pad();
        debug!("Applying {} border, pad {}px", self.name(), pad);

        let background = match self.variant {
            BorderVariant::Double => Rgb::WHITE,
            _ => params.color,
        };
        let framed = extend(image, Insets::uniform(pad), background.opaque())?;
        let (width, height) = framed.dimensions();

        let mut layers = Vec::new();
        if self.variant == BorderVariant::Double {
            layers.push(Layer::vector(self.double_rules(width, height, params.color)));
        }
        if let Some(radius) = self.variant.corner_radius() {
            let mask = VectorOverlay::new().with_shape(Shape::fill(
                Geometry::RoundedRect { rect: RectF::canvas(width, height), radius },
                Brush::Solid(Rgb::WHITE.opaque()),
            ));
            layers.push(Layer::vector(mask).blend(BlendMode::DestinationIn));
        }

        composite(framed, layers)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.05,
            procedural: false,
            growth: CanvasGrowth::Uniform(self.variant.pad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use rand::{rngs::SmallRng, SeedableRng};

    fn ctx() -> StyleContext {
        StyleContext::new(SmallRng::seed_from_u64(0))
    }

    fn photo(w: u32, h: u32) -> ImageBuffer {
        ImageBuffer::filled(w, h, Rgb::new(90, 140, 200).opaque()).unwrap()
    }

    #[test]
    fn test_border_output_size() {
        let params = FrameParams::new(Rgb::new(200, 30, 30));
        for variant in [
            BorderVariant::Thin,
            BorderVariant::Solid,
            BorderVariant::Thick,
            BorderVariant::Double,
            BorderVariant::Rounded,
        ] {
            for (w, h) in [(1, 1), (37, 91), (200, 120)] {
                let out = BorderStyle::new(variant).apply(photo(w, h), &params, &mut ctx()).unwrap();
                let p = variant.pad();
                assert_eq!(out.dimensions(), (w + 2 * p, h + 2 * p), "{variant:?} at {w}x{h}");
            }
        }
    }

    #[test]
    fn test_solid_border_color_and_rounded_corner() {
        let color = Rgb::new(200, 30, 30);
        let out = BorderStyle::new(BorderVariant::Solid)
            .apply(photo(100, 80), &FrameParams::new(color), &mut ctx())
            .unwrap();

        // middle of the left border band
        assert_eq!(out.pixel(3, 48), Some(color.opaque()));
        // photo untouched
        assert_eq!(out.pixel(58, 48), Some(Rgba::new(90, 140, 200, 255)));
        // outermost corner pixel is carved away
        assert_eq!(out.pixel(0, 0).map(|p| p.a), Some(0));
    }

    #[test]
    fn test_rounded_border_carves_corners() {
        let color = Rgb::new(20, 40, 160);
        let out = BorderStyle::new(BorderVariant::Rounded)
            .apply(photo(100, 80), &FrameParams::new(color), &mut ctx())
            .unwrap();
        assert_eq!(out.dimensions(), (124, 104));

        // arc centred 24px in from each corner
        for (x, y) in [(0, 0), (6, 6), (123, 0), (117, 97), (0, 103)] {
            assert_eq!(out.pixel(x, y).map(|p| p.a), Some(0), "({x}, {y})");
        }
        assert_eq!(out.pixel(2, 52), Some(color.opaque()));
        assert_eq!(out.pixel(60, 1), Some(color.opaque()));
        // first photo pixel sits inside the arc
        assert_eq!(out.pixel(12, 12), Some(Rgba::new(90, 140, 200, 255)));
    }

    #[test]
    fn test_double_border_rules() {
        let color = Rgb::new(10, 60, 10);
        let out = BorderStyle::new(BorderVariant::Double)
            .apply(photo(60, 60), &FrameParams::new(color), &mut ctx())
            .unwrap();

        // outer rule occupies x 1..3, inner rule x 11..13, white elsewhere in the pad
        assert_eq!(out.pixel(1, 50), Some(color.opaque()));
        assert_eq!(out.pixel(2, 50), Some(color.opaque()));
        assert_eq!(out.pixel(6, 50), Some(Rgba::new(255, 255, 255, 255)));
        assert_eq!(out.pixel(11, 50), Some(color.opaque()));
        assert_eq!(out.pixel(16, 50), Some(Rgba::new(255, 255, 255, 255)));
        assert_eq!(out.pixel(0, 0), Some(Rgba::new(255, 255, 255, 255)));
    }
}
