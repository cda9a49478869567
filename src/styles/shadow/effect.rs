use tracing::debug;

use crate::{
    color::Rgb,
    compositor::{composite, extend, Brush, Geometry, ImageBuffer, Layer, Shape, VectorOverlay},
    error::Result,
    geometry::{Ellipse, Insets, Point, RectF},
    styles::{
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
};

use super::{BORDER, MARGIN, SHADOW_STACK};

const SURFACE: Rgb = Rgb::new(242, 244, 248);

/// Bordered print floating above a light surface
pub struct ShadowStyle;

impl ShadowStyle {
    pub fn new() -> Self {
        Self
    }

    /// Blurred silhouettes of the print, each offset further down
    fn shadow_layers(print: RectF) -> Vec<Layer> {
        let mut layers: Vec<Layer> = SHADOW_STACK
            .iter()
            .map(|&(dy, sigma, opacity)| {
                let silhouette = VectorOverlay::new()
                    .with_shape(Shape::fill(
                        Geometry::Rect(print.translate(0.0, dy)),
                        Brush::Solid(Rgb::BLACK.with_opacity(opacity)),
                    ))
                    .blurred(sigma);
                Layer::vector(silhouette)
            })
            .collect();

        // contact shadow where the print meets the surface
        let contact = Ellipse {
            center: Point::new(print.center().x, print.bottom()),
            rx: print.width * 0.42,
            ry: (print.height * 0.03).max(6.0),
        };
        layers.push(Layer::vector(
            VectorOverlay::new()
                .with_shape(Shape::fill(Geometry::Ellipse(contact), Brush::Solid(Rgb::BLACK.with_opacity(0.18))))
                .blurred(8.0),
        ));

        layers
    }

    /// One pixel highlights and shades around the print edge
    fn edge_lights(print: RectF) -> VectorOverlay {
        let (x, y, w, h) = (print.x, print.y, print.width, print.height);
        let edge = |rect: RectF, color: Rgb, opacity: f32| {
            Shape::fill(Geometry::Rect(rect), Brush::Solid(color.with_opacity(opacity)))
        };

        VectorOverlay::from_shapes(vec![
            edge(RectF::new(x, y, w, 1.0), Rgb::WHITE, 0.25),
            edge(RectF::new(x, y, 1.0, h), Rgb::WHITE, 0.15),
            edge(RectF::new(x, print.bottom() - 1.0, w, 1.0), Rgb::BLACK, 0.12),
            edge(RectF::new(print.right() - 1.0, y, 1.0, h), Rgb::BLACK, 0.12),
        ])
    }
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for ShadowStyle {
    fn name(&self) -> &str {
        "shadow"
    }

    fn description(&self) -> &str {
        "Thin border with layered soft shadows on a pale surface"
    }

    fn apply(&self, image: ImageBuffer, params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
        debug!("Applying shadow frame in {}", params.color.to_hex());

        let print = extend(image, Insets::uniform(BORDER), params.color.opaque())?;
        let (pw, ph) = print.dimensions();
        let rect = RectF::new(MARGIN as f32, MARGIN as f32, pw as f32, ph as f32);

        let surface = ImageBuffer::filled(pw + 2 * MARGIN, ph + 2 * MARGIN, SURFACE.opaque())?;

        let mut layers = Self::shadow_layers(rect);
        layers.push(Layer::raster(print).at(MARGIN as i32, MARGIN as i32));
        layers.push(Layer::vector(Self::edge_lights(rect)));

        composite(surface, layers)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.5,
            procedural: false,
            growth: CanvasGrowth::Uniform(BORDER + MARGIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn apply(w: u32, h: u32) -> ImageBuffer {
        let photo = ImageBuffer::filled(w, h, Rgb::new(128, 128, 128).opaque()).unwrap();
        ShadowStyle::new()
            .apply(photo, &FrameParams::new(Rgb::new(200, 30, 30)), &mut StyleContext::new(SmallRng::seed_from_u64(0)))
            .unwrap()
    }

    #[test]
    fn test_shadow_dimensions() {
        let out = apply(80, 60);
        let grow = 2 * (BORDER + MARGIN);
        assert_eq!(out.dimensions(), (80 + grow, 60 + grow));
    }

    #[test]
    fn test_border_and_photo_preserved() {
        let out = apply(80, 60);
        let border = out.pixel(MARGIN + 2, MARGIN + 30).unwrap();
        assert_eq!(border, Rgb::new(200, 30, 30).opaque());
        let center = out.pixel(out.width() / 2, out.height() / 2).unwrap();
        assert_eq!(center, Rgb::new(128, 128, 128).opaque());
    }

    #[test]
    fn test_shadow_falls_below() {
        let out = apply(80, 60);
        let (w, h) = out.dimensions();
        let above = out.pixel(w / 2, MARGIN - 6).unwrap().rgb().luminance();
        let below = out.pixel(w / 2, h - MARGIN + 6).unwrap().rgb().luminance();
        assert!(below < above, "below {below} should be darker than above {above}");
        let corner = out.pixel(0, 0).unwrap();
        assert!(corner.r.abs_diff(SURFACE.r) <= 1 && corner.b.abs_diff(SURFACE.b) <= 1);
    }
}
