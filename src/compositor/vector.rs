//! Declarative vector overlays.
//!
//! Styles describe shapes, gradients, strokes, blur and clipping as plain
//! data; the compositor rasterizes the description onto a transparent
//! canvas the size of the base image and blends it like any raster layer.

use tiny_skia::{
    FillRule, GradientStop, LineCap, LineJoin, LinearGradient, Mask, Paint, Path, PathBuilder,
    Pixmap, RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};
use tracing::debug;

use crate::{
    color::Rgba,
    compositor::blur,
    error::{CompositingError, Result},
    geometry::{Circle, Ellipse, Point, RectF},
};

/// Control point of a gradient
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    pub offset: f32,
    pub color: Rgba,
}

impl Stop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// What a shape is painted with
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Rgba),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<Stop>,
    },
    /// Elliptical radial gradient; offset 1.0 lands on the ellipse
    Radial {
        center: Point,
        rx: f32,
        ry: f32,
        stops: Vec<Stop>,
    },
}

impl Brush {
    pub fn radial(ellipse: Ellipse, stops: Vec<Stop>) -> Self {
        Brush::Radial { center: ellipse.center, rx: ellipse.rx, ry: ellipse.ry, stops }
    }

    fn shader(&self) -> Option<Shader<'static>> {
        let to_stops = |stops: &[Stop]| -> Vec<GradientStop> {
            stops
                .iter()
                .map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0), s.color.to_skia()))
                .collect()
        };

        match self {
            Brush::Solid(color) => Some(Shader::SolidColor(color.to_skia())),
            Brush::Linear { start, end, stops } => LinearGradient::new(
                tiny_skia::Point::from_xy(start.x, start.y),
                tiny_skia::Point::from_xy(end.x, end.y),
                to_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            ),
            Brush::Radial { center, rx, ry, stops } => RadialGradient::new(
                tiny_skia::Point::from_xy(0.0, 0.0),
                tiny_skia::Point::from_xy(0.0, 0.0),
                1.0,
                to_stops(stops),
                SpreadMode::Pad,
                Transform::from_row(*rx, 0.0, 0.0, *ry, center.x, center.y),
            ),
        }
    }
}

/// Outline of a shape
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Rect(RectF),
    RoundedRect { rect: RectF, radius: f32 },
    Circle(Circle),
    Ellipse(Ellipse),
    /// Closed polygon
    Polygon(Vec<Point>),
    /// Open segment, only meaningful when stroked
    Line { from: Point, to: Point },
    /// Several outlines filled with the even-odd rule, so nested outlines cut holes
    Compound(Vec<Geometry>),
}

impl Geometry {
    /// Ring between two nested rectangles
    pub fn rect_ring(outer: RectF, inner: RectF) -> Self {
        Geometry::Compound(vec![Geometry::Rect(outer), Geometry::Rect(inner)])
    }

    fn fill_rule(&self) -> FillRule {
        match self {
            Geometry::Compound(_) => FillRule::EvenOdd,
            _ => FillRule::Winding,
        }
    }

    fn to_path(&self) -> Option<Path> {
        let mut pb = PathBuilder::new();
        self.push_to(&mut pb);
        pb.finish()
    }

    fn push_to(&self, pb: &mut PathBuilder) {
        match self {
            Geometry::Rect(r) => {
                if let Some(rect) = to_rect(r) {
                    pb.push_rect(rect);
                }
            }
            Geometry::RoundedRect { rect, radius } => push_rounded_rect(pb, rect, *radius),
            Geometry::Circle(c) => {
                if c.radius > 0.0 {
                    pb.push_circle(c.center.x, c.center.y, c.radius);
                }
            }
            Geometry::Ellipse(e) => {
                if let Some(rect) = to_rect(&e.bounding_box()) {
                    pb.push_oval(rect);
                }
            }
            Geometry::Polygon(points) => {
                if let Some((first, rest)) = points.split_first() {
                    pb.move_to(first.x, first.y);
                    for p in rest {
                        pb.line_to(p.x, p.y);
                    }
                    pb.close();
                }
            }
            Geometry::Line { from, to } => {
                pb.move_to(from.x, from.y);
                pb.line_to(to.x, to.y);
            }
            Geometry::Compound(parts) => {
                for part in parts {
                    part.push_to(pb);
                }
            }
        }
    }
}

fn to_rect(r: &RectF) -> Option<Rect> {
    Rect::from_xywh(r.x, r.y, r.width, r.height)
}

fn push_rounded_rect(pb: &mut PathBuilder, r: &RectF, radius: f32) {
    let radius = radius.min(r.width / 2.0).min(r.height / 2.0).max(0.0);
    if radius == 0.0 {
        if let Some(rect) = to_rect(r) {
            pb.push_rect(rect);
        }
        return;
    }

    // cubic approximation of a quarter circle
    let k = radius * 0.552_284_8;
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());

    pb.move_to(x0 + radius, y0);
    pb.line_to(x1 - radius, y0);
    pb.cubic_to(x1 - radius + k, y0, x1, y0 + radius - k, x1, y0 + radius);
    pb.line_to(x1, y1 - radius);
    pb.cubic_to(x1, y1 - radius + k, x1 - radius + k, y1, x1 - radius, y1);
    pb.line_to(x0 + radius, y1);
    pb.cubic_to(x0 + radius - k, y1, x0, y1 - radius + k, x0, y1 - radius);
    pb.line_to(x0, y0 + radius);
    pb.cubic_to(x0, y0 + radius - k, x0 + radius - k, y0, x0 + radius, y0);
    pb.close();
}

/// Fill or stroke
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeStyle {
    Fill,
    Stroke { width: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub brush: Brush,
    pub style: ShapeStyle,
}

impl Shape {
    pub fn fill(geometry: Geometry, brush: Brush) -> Self {
        Self { geometry, brush, style: ShapeStyle::Fill }
    }

    pub fn stroke(geometry: Geometry, brush: Brush, width: f32) -> Self {
        Self { geometry, brush, style: ShapeStyle::Stroke { width } }
    }
}

/// An ordered list of shapes plus optional blur and clip, rasterized as one layer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorOverlay {
    pub shapes: Vec<Shape>,
    /// Gaussian sigma in pixels applied to the rasterized shapes
    pub blur_sigma: f32,
    /// Shapes are only painted inside this outline
    pub clip: Option<Geometry>,
}

impl VectorOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes, ..Self::default() }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn blurred(mut self, sigma: f32) -> Self {
        self.blur_sigma = sigma;
        self
    }

    pub fn clipped(mut self, clip: Geometry) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Rasterize onto a transparent `width x height` canvas, shifted by `(dx, dy)`
    pub fn rasterize(&self, width: u32, height: u32, dx: f32, dy: f32) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or(CompositingError::CanvasAllocation { width, height })?;
        let transform = Transform::from_translate(dx, dy);

        let mask = match &self.clip {
            Some(clip) => {
                let mut mask = Mask::new(width, height)
                    .ok_or(CompositingError::CanvasAllocation { width, height })?;
                if let Some(path) = clip.to_path() {
                    mask.fill_path(&path, clip.fill_rule(), true, transform);
                }
                Some(mask)
            }
            None => None,
        };

        for shape in &self.shapes {
            let Some(path) = shape.geometry.to_path() else {
                debug!("Skipping degenerate shape {:?}", shape.geometry);
                continue;
            };
            let Some(shader) = shape.brush.shader() else {
                debug!("Skipping shape with degenerate brush");
                continue;
            };

            let paint = Paint {
                shader,
                anti_alias: true,
                ..Paint::default()
            };

            match shape.style {
                ShapeStyle::Fill => {
                    pixmap.fill_path(&path, &paint, shape.geometry.fill_rule(), transform, mask.as_ref());
                }
                ShapeStyle::Stroke { width } => {
                    let stroke = Stroke {
                        width,
                        line_cap: LineCap::Butt,
                        line_join: LineJoin::Miter,
                        ..Stroke::default()
                    };
                    pixmap.stroke_path(&path, &paint, &stroke, transform, mask.as_ref());
                }
            }
        }

        if self.blur_sigma > 0.0 {
            blur::gaussian_blur(&mut pixmap, self.blur_sigma);
        }

        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    #[test]
    fn test_solid_rect() {
        let overlay = VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(RectF::new(2.0, 2.0, 4.0, 4.0)),
            Brush::Solid(Rgb::WHITE.opaque()),
        ));
        let pixmap = overlay.rasterize(10, 10, 0.0, 0.0).unwrap();
        assert_eq!(alpha_at(&pixmap, 3, 3), 255);
        assert_eq!(alpha_at(&pixmap, 0, 0), 0);
        assert_eq!(alpha_at(&pixmap, 7, 7), 0);
    }

    #[test]
    fn test_offset_moves_shapes() {
        let overlay = VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(RectF::new(0.0, 0.0, 2.0, 2.0)),
            Brush::Solid(Rgb::WHITE.opaque()),
        ));
        let pixmap = overlay.rasterize(10, 10, 5.0, 5.0).unwrap();
        assert_eq!(alpha_at(&pixmap, 0, 0), 0);
        assert_eq!(alpha_at(&pixmap, 6, 6), 255);
    }

    #[test]
    fn test_compound_cuts_holes() {
        let ring = Geometry::rect_ring(RectF::new(0.0, 0.0, 20.0, 20.0), RectF::new(5.0, 5.0, 10.0, 10.0));
        let overlay = VectorOverlay::new().with_shape(Shape::fill(ring, Brush::Solid(Rgb::BLACK.opaque())));
        let pixmap = overlay.rasterize(20, 20, 0.0, 0.0).unwrap();
        assert_eq!(alpha_at(&pixmap, 2, 2), 255);
        assert_eq!(alpha_at(&pixmap, 10, 10), 0);
    }

    #[test]
    fn test_clip_limits_painting() {
        let overlay = VectorOverlay::new()
            .with_shape(Shape::fill(
                Geometry::Rect(RectF::canvas(20, 20)),
                Brush::Solid(Rgb::WHITE.opaque()),
            ))
            .clipped(Geometry::Rect(RectF::new(0.0, 0.0, 10.0, 20.0)));
        let pixmap = overlay.rasterize(20, 20, 0.0, 0.0).unwrap();
        assert_eq!(alpha_at(&pixmap, 4, 10), 255);
        assert_eq!(alpha_at(&pixmap, 15, 10), 0);
    }

    #[test]
    fn test_radial_gradient_fades_outward() {
        let ellipse = Ellipse { center: Point::new(20.0, 20.0), rx: 20.0, ry: 20.0 };
        let overlay = VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(RectF::canvas(40, 40)),
            Brush::radial(
                ellipse,
                vec![
                    Stop::new(0.0, Rgba::new(0, 0, 0, 255)),
                    Stop::new(1.0, Rgba::TRANSPARENT),
                ],
            ),
        ));
        let pixmap = overlay.rasterize(40, 40, 0.0, 0.0).unwrap();
        assert!(alpha_at(&pixmap, 20, 20) > 240);
        assert!(alpha_at(&pixmap, 30, 20) < alpha_at(&pixmap, 20, 20));
        assert_eq!(alpha_at(&pixmap, 0, 0), 0);
    }

    #[test]
    fn test_blur_softens_edges() {
        let sharp = VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Rect(RectF::new(10.0, 10.0, 20.0, 20.0)),
            Brush::Solid(Rgb::BLACK.opaque()),
        ));
        let soft = sharp.clone().blurred(3.0);

        let a = sharp.rasterize(40, 40, 0.0, 0.0).unwrap();
        let b = soft.rasterize(40, 40, 0.0, 0.0).unwrap();
        assert_eq!(alpha_at(&a, 8, 20), 0);
        assert!(alpha_at(&b, 8, 20) > 0);
        assert!(alpha_at(&b, 20, 20) > 200);
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let overlay = VectorOverlay::new()
            .with_shape(Shape::fill(Geometry::Polygon(vec![]), Brush::Solid(Rgb::WHITE.opaque())))
            .with_shape(Shape::fill(
                Geometry::Rect(RectF::canvas(4, 4)),
                Brush::Radial { center: Point::new(0.0, 0.0), rx: 0.0, ry: 0.0, stops: vec![] },
            ));
        assert!(overlay.rasterize(4, 4, 0.0, 0.0).is_ok());
    }
}
