use tracing::debug;

use crate::{
    color::{Rgb, Rgba},
    compositor::{composite, Brush, Geometry, ImageBuffer, Layer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{Ellipse, RectF},
    styles::{
        traits::{FrameParams, StyleContext, StyleMetadata},
        Style,
    },
};

use super::{FALLOFFS, SOFTEN_FRACTION};

/// Corner darkening without a frame
pub struct VignetteStyle;

impl VignetteStyle {
    pub fn new() -> Self {
        Self
    }

    fn falloff(area: RectF, scale: f32, inner: f32, edge_opacity: f32) -> Shape {
        Shape::fill(
            Geometry::Rect(area),
            Brush::radial(
                Ellipse::covering(area, scale),
                vec![
                    Stop::new(0.0, Rgba::TRANSPARENT),
                    Stop::new(inner, Rgba::TRANSPARENT),
                    Stop::new(1.0, Rgb::BLACK.with_opacity(edge_opacity)),
                ],
            ),
        )
    }
}

impl Default for VignetteStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for VignetteStyle {
    fn name(&self) -> &str {
        "vignette"
    }

    fn description(&self) -> &str {
        "Elliptical corner darkening, canvas size unchanged"
    }

    fn apply(&self, image: ImageBuffer, params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let intensity = params.vignette_intensity;
        debug!("Applying vignette at intensity {:.2}", intensity);

        let (width, height) = image.dimensions();
        let area = RectF::canvas(width, height);
        let soften = SOFTEN_FRACTION * width.max(height) as f32;

        let layers = FALLOFFS.iter().map(|&(scale, inner, edge, softened)| {
            let overlay = VectorOverlay::new().with_shape(Self::falloff(area, scale, inner, edge * intensity));
            Layer::vector(if softened { overlay.blurred(soften) } else { overlay })
        });

        composite(image, layers)
    }

    fn supplies_own_tint(&self) -> bool {
        true
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.25,
            ..StyleMetadata::default()
        }
    }
}
