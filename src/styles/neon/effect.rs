use tracing::debug;

use crate::{
    color::{Rgb, Rgba},
    compositor::{adjust, composite, extend, BlendMode, Brush, Geometry, ImageBuffer, Layer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{Ellipse, Insets, Point, RectF},
    styles::{
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
};

use super::{BLOOM, DEFAULT_NEON, SURROUND, TUBE_INSET, TUBE_RADIUS};

const DARK_SURROUND: Rgb = Rgb::new(8, 8, 12);
const PHOTO_DIM: f32 = 0.92;
const EDGE_SPILL: f32 = 0.30;
const SPILL_REACH: f32 = 0.20;
const CORNER_GLOW: [f32; 4] = [0.12, 0.10, 0.10, 0.12];

/// Glowing neon tube frame
pub struct NeonStyle;

impl NeonStyle {
    pub fn new() -> Self {
        Self
    }

    /// Tube light spilling inward from each edge of the photo, plus an
    /// elliptical rim glow
    fn spill(width: u32, height: u32, color: Rgb) -> VectorOverlay {
        let area = RectF::canvas(width, height);
        let (w, h) = (area.width, area.height);
        let (reach_x, reach_y) = (w * SPILL_REACH, h * SPILL_REACH);
        let fade = |start: Point, end: Point| Brush::Linear {
            start,
            end,
            stops: vec![Stop::new(0.0, color.with_opacity(EDGE_SPILL)), Stop::new(1.0, Rgba::TRANSPARENT)],
        };

        let mut overlay = VectorOverlay::from_shapes(vec![
            Shape::fill(
                Geometry::Rect(RectF::new(0.0, 0.0, w, reach_y)),
                fade(Point::new(0.0, 0.0), Point::new(0.0, reach_y)),
            ),
            Shape::fill(
                Geometry::Rect(RectF::new(0.0, h - reach_y, w, reach_y)),
                fade(Point::new(0.0, h), Point::new(0.0, h - reach_y)),
            ),
            Shape::fill(
                Geometry::Rect(RectF::new(0.0, 0.0, reach_x, h)),
                fade(Point::new(0.0, 0.0), Point::new(reach_x, 0.0)),
            ),
            Shape::fill(
                Geometry::Rect(RectF::new(w - reach_x, 0.0, reach_x, h)),
                fade(Point::new(w, 0.0), Point::new(w - reach_x, 0.0)),
            ),
        ]);

        let rim = Ellipse { center: area.center(), rx: w * 0.55, ry: h * 0.55 };
        overlay.push(Shape::fill(
            Geometry::Rect(area),
            Brush::radial(
                rim,
                vec![
                    Stop::new(0.0, Rgba::TRANSPARENT),
                    Stop::new(0.55, Rgba::TRANSPARENT),
                    Stop::new(0.85, color.with_opacity(0.15)),
                    Stop::new(1.0, color.with_opacity(0.30)),
                ],
            ),
        ));

        overlay
    }

    /// Faint color haze over the whole surround
    fn ambient(area: RectF, color: Rgb) -> VectorOverlay {
        let haze = Ellipse { center: area.center(), rx: area.width * 0.6, ry: area.height * 0.6 };
        VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(area),
            Brush::radial(haze, vec![Stop::new(0.0, color.with_opacity(0.07)), Stop::new(1.0, Rgba::TRANSPARENT)]),
        ))
    }

    fn corner_glows(area: RectF, color: Rgb) -> VectorOverlay {
        let radius = area.width.min(area.height) * 0.35;
        let corners = [area.top_left(), area.top_right(), area.bottom_right(), area.bottom_left()];

        VectorOverlay::from_shapes(
            corners
                .into_iter()
                .zip(CORNER_GLOW)
                .map(|(center, opacity)| {
                    Shape::fill(
                        Geometry::Rect(area),
                        Brush::radial(
                            Ellipse { center, rx: radius, ry: radius },
                            vec![Stop::new(0.0, color.with_opacity(opacity)), Stop::new(1.0, Rgba::TRANSPARENT)],
                        ),
                    )
                })
                .collect(),
        )
    }
}

impl Default for NeonStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for NeonStyle {
    fn name(&self) -> &str {
        "neon"
    }

    fn description(&self) -> &str {
        "Glowing neon tube on a dark surround with edge-lit photo"
    }

    fn apply(&self, image: ImageBuffer, params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let color = params.color;
        debug!("Applying neon frame in {}", color.to_hex());

        let (w, h) = image.dimensions();
        let dimmed = adjust::brightness(image, PHOTO_DIM);
        let lit = composite(dimmed, [Layer::vector(Self::spill(w, h, color)).blend(BlendMode::Screen)])?;

        let canvas = extend(lit, Insets::uniform(SURROUND), DARK_SURROUND.opaque())?;
        let area = RectF::canvas(canvas.width(), canvas.height());
        let tube = Geometry::RoundedRect { rect: area.inset(TUBE_INSET), radius: TUBE_RADIUS };

        let mut layers = vec![Layer::vector(Self::ambient(area, color)).blend(BlendMode::Screen)];

        layers.extend(BLOOM.iter().map(|&(width, sigma, opacity)| {
            let pass = VectorOverlay::new()
                .with_shape(Shape::stroke(tube.clone(), Brush::Solid(color.opaque()), width))
                .blurred(sigma);
            Layer::vector(pass).blend(BlendMode::Screen).opacity(opacity)
        }));

        layers.push(Layer::vector(VectorOverlay::new().with_shape(Shape::stroke(
            tube.clone(),
            Brush::Solid(Rgb::WHITE.with_opacity(0.88)),
            3.5,
        ))));
        layers.push(Layer::vector(VectorOverlay::new().with_shape(Shape::stroke(
            tube,
            Brush::Solid(color.with_opacity(0.92)),
            2.5,
        ))));
        layers.push(Layer::vector(Self::corner_glows(area, color)).blend(BlendMode::Screen));

        composite(canvas, layers)
    }

    fn supplies_own_tint(&self) -> bool {
        true
    }

    fn default_color(&self) -> Rgb {
        DEFAULT_NEON
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.8,
            procedural: false,
            growth: CanvasGrowth::Uniform(SURROUND),
        }
    }
}
