//! Shared construction for picture-frame rings.
//!
//! Metallic, classic and wooden frames are all four mitered panels around
//! the photo. They differ only in palette and band layout, so the panel,
//! seam, bevel and wall-shadow geometry lives here.

use crate::{
    color::{Rgb, Rgba},
    compositor::{composite, Brush, Geometry, ImageBuffer, Layer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{miter_trapezoid, Point, RectF, Side},
};

/// Seven tones of a moulding, darkest to brightest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouldingPalette {
    pub dark: Rgb,
    pub mid_dark: Rgb,
    pub mid: Rgb,
    pub mid_light: Rgb,
    pub light: Rgb,
    pub highlight: Rgb,
    pub edge: Rgb,
}

impl MouldingPalette {
    /// Stops across a panel from outer edge to rabbet. Top and left catch
    /// the light; bottom and right fall into shade.
    pub fn side_stops(&self, side: Side) -> Vec<Stop> {
        let stops: [(f32, Rgb); 6] = if is_lit(side) {
            [
                (0.0, self.edge),
                (0.15, self.light),
                (0.35, self.highlight),
                (0.6, self.mid_light),
                (0.85, self.mid),
                (1.0, self.mid_dark),
            ]
        } else {
            [
                (0.0, self.mid),
                (0.2, self.mid_light),
                (0.4, self.mid),
                (0.65, self.mid_dark),
                (0.9, self.dark),
                (1.0, self.dark),
            ]
        };
        stops.iter().map(|&(o, c)| Stop::new(o, c.opaque())).collect()
    }
}

/// Light comes from the top-left
pub fn is_lit(side: Side) -> bool {
    matches!(side, Side::Top | Side::Left)
}

/// Lighten or darken a color to suggest which way a panel faces the light
pub fn shade(color: Rgb, side: Side) -> Rgb {
    let factor = match side {
        Side::Top => 1.12,
        Side::Left => 1.06,
        Side::Right => 0.90,
        Side::Bottom => 0.82,
    };
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    Rgb::new(scale(color.r), scale(color.g), scale(color.b))
}

/// Four mitered panels of depth `depth` inside `outer`, each painted by `brush_for`
pub fn mitered_panels<F>(outer: RectF, depth: f32, brush_for: F) -> Vec<Shape>
where
    F: Fn(Side) -> Brush,
{
    Side::ALL
        .into_iter()
        .map(|side| Shape::fill(Geometry::Polygon(miter_trapezoid(side, outer, depth).to_vec()), brush_for(side)))
        .collect()
}

/// Linear gradient running across one panel, outer edge to rabbet
pub fn panel_gradient(side: Side, outer: RectF, depth: f32, stops: Vec<Stop>) -> Brush {
    let (start, end) = side.inward_axis(outer, depth);
    Brush::Linear { start, end, stops }
}

/// How one concentric band of a moulding is painted
#[derive(Debug, Clone, PartialEq)]
pub enum BandFill {
    Flat(Rgb),
    /// Gradient across the band, outer edge first
    Sweep(Vec<Rgb>),
}

/// One concentric band of a moulding
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub width: f32,
    pub fill: BandFill,
}

impl Band {
    pub fn flat(width: f32, color: Rgb) -> Self {
        Self { width, fill: BandFill::Flat(color) }
    }

    pub fn sweep(width: f32, colors: &[Rgb]) -> Self {
        Self { width, fill: BandFill::Sweep(colors.to_vec()) }
    }
}

/// Total depth of a band stack
pub fn stack_depth(bands: &[Band]) -> f32 {
    bands.iter().map(|b| b.width).sum()
}

/// Concentric mitered bands, outermost first, each shaded per side
pub fn band_stack(outer: RectF, bands: &[Band]) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(bands.len() * 4);
    let mut offset = 0.0;

    for band in bands {
        let band_outer = outer.inset(offset);
        shapes.extend(mitered_panels(band_outer, band.width, |side| match &band.fill {
            BandFill::Flat(color) => Brush::Solid(shade(*color, side).opaque()),
            BandFill::Sweep(colors) => {
                let last = colors.len().saturating_sub(1).max(1) as f32;
                let stops = colors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Stop::new(i as f32 / last, shade(*c, side).opaque()))
                    .collect();
                panel_gradient(side, band_outer, band.width, stops)
            }
        }));
        offset += band.width;
    }

    shapes
}

/// Thin lines along the four 45 degree corner joints
pub fn miter_seams(outer: RectF, depth: f32, color: Rgba, width: f32) -> Vec<Shape> {
    let inner = outer.inset(depth);
    [
        (outer.top_left(), inner.top_left()),
        (outer.top_right(), inner.top_right()),
        (outer.bottom_right(), inner.bottom_right()),
        (outer.bottom_left(), inner.bottom_left()),
    ]
    .into_iter()
    .map(|(from, to)| Shape::stroke(Geometry::Line { from, to }, Brush::Solid(color), width))
    .collect()
}

/// Shadow the frame lip casts onto the photo along the top and left, and a
/// faint highlight along the bottom and right
pub fn inner_bevel(inner: RectF, shadow_depth: f32, highlight_depth: f32) -> Vec<Shape> {
    let shadow = |from: Point, to: Point| Brush::Linear {
        start: from,
        end: to,
        stops: vec![Stop::new(0.0, Rgb::BLACK.with_opacity(0.45)), Stop::new(1.0, Rgba::TRANSPARENT)],
    };
    let highlight = |from: Point, to: Point| Brush::Linear {
        start: from,
        end: to,
        stops: vec![Stop::new(0.0, Rgb::WHITE.with_opacity(0.22)), Stop::new(1.0, Rgba::TRANSPARENT)],
    };

    let (x, y, w, h) = (inner.x, inner.y, inner.width, inner.height);
    vec![
        Shape::fill(
            Geometry::Rect(RectF::new(x, y, w, shadow_depth)),
            shadow(Point::new(x, y), Point::new(x, y + shadow_depth)),
        ),
        Shape::fill(
            Geometry::Rect(RectF::new(x, y, shadow_depth, h)),
            shadow(Point::new(x, y), Point::new(x + shadow_depth, y)),
        ),
        Shape::fill(
            Geometry::Rect(RectF::new(x, inner.bottom() - highlight_depth, w, highlight_depth)),
            highlight(Point::new(x, inner.bottom()), Point::new(x, inner.bottom() - highlight_depth)),
        ),
        Shape::fill(
            Geometry::Rect(RectF::new(inner.right() - highlight_depth, y, highlight_depth, h)),
            highlight(Point::new(inner.right(), y), Point::new(inner.right() - highlight_depth, y)),
        ),
    ]
}

/// Soft shadow an object casts on the surface it is mounted on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    /// Surface visible around the object on every side
    pub margin: u32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub sigma: f32,
    pub opacity: f32,
    pub surface: Rgb,
}

/// Place `image` on a surface with a blurred shadow underneath
pub fn mount(image: ImageBuffer, shadow: &DropShadow) -> Result<ImageBuffer> {
    let (w, h) = image.dimensions();
    let m = shadow.margin;
    let canvas = ImageBuffer::filled(w + 2 * m, h + 2 * m, shadow.surface.opaque())?;

    let silhouette = VectorOverlay::new()
        .with_shape(Shape::fill(
            Geometry::Rect(RectF::new(
                m as f32 + shadow.offset_x,
                m as f32 + shadow.offset_y,
                w as f32,
                h as f32,
            )),
            Brush::Solid(Rgb::BLACK.with_opacity(shadow.opacity)),
        ))
        .blurred(shadow.sigma);

    composite(
        canvas,
        [Layer::vector(silhouette), Layer::raster(image).at(m as i32, m as i32)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRASS: MouldingPalette = MouldingPalette {
        dark: Rgb::new(40, 30, 10),
        mid_dark: Rgb::new(80, 60, 20),
        mid: Rgb::new(120, 90, 30),
        mid_light: Rgb::new(160, 120, 40),
        light: Rgb::new(200, 150, 50),
        highlight: Rgb::new(240, 200, 100),
        edge: Rgb::new(250, 240, 200),
    };

    #[test]
    fn test_lit_sides_are_brighter() {
        let lum = |stops: Vec<Stop>| stops.iter().map(|s| s.color.rgb().luminance()).sum::<f32>();
        assert!(lum(BRASS.side_stops(Side::Top)) > lum(BRASS.side_stops(Side::Bottom)));
        assert!(lum(BRASS.side_stops(Side::Left)) > lum(BRASS.side_stops(Side::Right)));
    }

    #[test]
    fn test_shade_direction() {
        let c = Rgb::new(100, 100, 100);
        assert!(shade(c, Side::Top).r > c.r);
        assert!(shade(c, Side::Bottom).r < c.r);
        assert_eq!(shade(Rgb::WHITE, Side::Top), Rgb::WHITE);
    }

    #[test]
    fn test_band_stack_covers_ring() {
        let bands = [Band::flat(4.0, Rgb::new(90, 60, 30)), Band::sweep(6.0, &[Rgb::BLACK, Rgb::WHITE])];
        assert_eq!(stack_depth(&bands), 10.0);

        let outer = RectF::canvas(60, 40);
        let shapes = band_stack(outer, &bands);
        assert_eq!(shapes.len(), 8);

        let pixmap = VectorOverlay::from_shapes(shapes).rasterize(60, 40, 0.0, 0.0).unwrap();
        assert_eq!(pixmap.pixel(2, 20).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(7, 20).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(30, 20).unwrap().alpha(), 0);
    }

    #[test]
    fn test_mount_grows_by_margin_and_keeps_image() {
        let image = ImageBuffer::filled(20, 10, Rgb::new(255, 0, 0).opaque()).unwrap();
        let shadow = DropShadow {
            margin: 8,
            offset_x: 0.0,
            offset_y: 3.0,
            sigma: 3.0,
            opacity: 0.5,
            surface: Rgb::WHITE,
        };
        let out = mount(image, &shadow).unwrap();
        assert_eq!(out.dimensions(), (36, 26));
        assert_eq!(out.pixel(18, 13), Some(Rgba::new(255, 0, 0, 255)));

        let under = out.pixel(18, 20).unwrap();
        assert!(under.r < 255, "shadow should darken the surface below the image");
        assert_eq!(out.pixel(0, 0), Some(Rgba::new(255, 255, 255, 255)));
    }
}
