//! # Geometry Utility
//!
//! Placement math for overlays and the shared picture-frame skeleton: every
//! moulded frame (metallic, classic, wooden) is four mitered trapezoids cut
//! from a ring between an outer rectangle and an inset inner rectangle.

/// A point in canvas pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a whole `width x height` canvas
    pub fn canvas(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink on every side by `d`. Width and height never go negative.
    pub fn inset(&self, d: f32) -> Self {
        Self::new(
            self.x + d,
            self.y + d,
            (self.width - 2.0 * d).max(0.0),
            (self.height - 2.0 * d).max(0.0),
        )
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.bottom())
    }
}

/// Per-side canvas extension in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Insets {
    pub const fn uniform(pad: u32) -> Self {
        Self { top: pad, right: pad, bottom: pad, left: pad }
    }

    pub const fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// One side of a rectangular frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Perimeter walking order
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Gradient axis across a panel of this side, from the outer edge
    /// to the inner (rabbet) edge
    pub fn inward_axis(&self, outer: RectF, inset: f32) -> (Point, Point) {
        let mid = outer.center();
        match self {
            Side::Top => (Point::new(mid.x, outer.y), Point::new(mid.x, outer.y + inset)),
            Side::Bottom => (Point::new(mid.x, outer.bottom()), Point::new(mid.x, outer.bottom() - inset)),
            Side::Left => (Point::new(outer.x, mid.y), Point::new(outer.x + inset, mid.y)),
            Side::Right => (Point::new(outer.right(), mid.y), Point::new(outer.right() - inset, mid.y)),
        }
    }
}

/// Convert a percentage of `extent` to whole pixels
pub fn percent_to_px(pct: f32, extent: u32) -> i64 {
    ((pct as f64 / 100.0) * extent as f64).round() as i64
}

/// Clamp the top-left of a `box_w x box_h` box so the box stays inside the
/// container. A box larger than the container is pinned to 0.
pub fn clamp_placement(
    left: i64,
    top: i64,
    box_w: u32,
    box_h: u32,
    container_w: u32,
    container_h: u32,
) -> (u32, u32) {
    let max_left = container_w.saturating_sub(box_w) as i64;
    let max_top = container_h.saturating_sub(box_h) as i64;
    (left.clamp(0, max_left) as u32, top.clamp(0, max_top) as u32)
}

/// Overlay box for a percentage placement: width is `scale_pct` of the
/// container width (at least 1px, at most the container), height follows
/// the source aspect ratio (or equals the width for square/circular
/// overlays), and the result is shrunk to fit the container height.
pub fn overlay_size(
    scale_pct: f32,
    source_w: u32,
    source_h: u32,
    square: bool,
    container_w: u32,
    container_h: u32,
) -> (u32, u32) {
    let width = percent_to_px(scale_pct, container_w).clamp(1, container_w.max(1) as i64) as u32;
    let height = if square || source_w == 0 {
        width
    } else {
        ((source_h as f64 * width as f64 / source_w as f64).round() as u32).max(1)
    };
    fit_within(width, height, container_w.max(1), container_h.max(1))
}

/// Scale `(w, h)` down, preserving aspect ratio, until it fits `max_w x max_h`
pub fn fit_within(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w <= max_w && h <= max_h {
        return (w, h);
    }
    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    (
        ((w as f64 * scale).round() as u32).clamp(1, max_w),
        ((h as f64 * scale).round() as u32).clamp(1, max_h),
    )
}

/// Quadrilateral of one mitered frame panel.
///
/// `outer` is the frame's outer rectangle and `inset` the panel depth
/// toward the photo. Corners meet the neighbouring panels at 45 degrees.
/// Points run clockwise starting from the outer edge.
pub fn miter_trapezoid(side: Side, outer: RectF, inset: f32) -> [Point; 4] {
    let inner = outer.inset(inset);
    match side {
        Side::Top => [outer.top_left(), outer.top_right(), inner.top_right(), inner.top_left()],
        Side::Right => [outer.top_right(), outer.bottom_right(), inner.bottom_right(), inner.top_right()],
        Side::Bottom => [outer.bottom_right(), outer.bottom_left(), inner.bottom_left(), inner.bottom_right()],
        Side::Left => [outer.bottom_left(), outer.top_left(), inner.top_left(), inner.bottom_left()],
    }
}

/// Circle parameterization
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    /// Circle inscribed in a box
    pub fn inscribed(rect: RectF) -> Self {
        Self {
            center: rect.center(),
            radius: rect.width.min(rect.height) / 2.0,
        }
    }

    pub fn bounding_box(&self) -> RectF {
        RectF::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub fn point_at(&self, angle: f32) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

/// Ellipse parameterization
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f32,
    pub ry: f32,
}

impl Ellipse {
    pub fn bounding_box(&self) -> RectF {
        RectF::new(self.center.x - self.rx, self.center.y - self.ry, self.rx * 2.0, self.ry * 2.0)
    }

    /// Ellipse through the corners of `rect`, scaled by `factor`
    pub fn covering(rect: RectF, factor: f32) -> Self {
        let k = std::f32::consts::SQRT_2 * factor;
        Self {
            center: rect.center(),
            rx: rect.width / 2.0 * k,
            ry: rect.height / 2.0 * k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    #[test]
    fn test_clamped_box_stays_inside_container() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..5000 {
            let cw = rng.gen_range(1..3000u32);
            let ch = rng.gen_range(1..3000u32);
            let x = rng.gen_range(-200.0..300.0f32);
            let y = rng.gen_range(-200.0..300.0f32);
            let scale = rng.gen_range(0.01..150.0f32);
            let src_w = rng.gen_range(1..2000u32);
            let src_h = rng.gen_range(1..2000u32);
            let square = rng.gen_bool(0.5);

            let (w, h) = overlay_size(scale, src_w, src_h, square, cw, ch);
            let (left, top) = clamp_placement(percent_to_px(x, cw), percent_to_px(y, ch), w, h, cw, ch);

            assert!(left + w <= cw, "x overflow: {left}+{w} > {cw}");
            assert!(top + h <= ch, "y overflow: {top}+{h} > {ch}");
        }
    }

    #[test]
    fn test_clamp_overflowing_placement() {
        // 30% logo at 80%/80% of a 1000px square would overflow by 100px
        let (w, h) = overlay_size(30.0, 400, 400, true, 1000, 1000);
        assert_eq!((w, h), (300, 300));
        let (left, top) = clamp_placement(percent_to_px(80.0, 1000), percent_to_px(80.0, 1000), w, h, 1000, 1000);
        assert_eq!((left, top), (700, 700));
    }

    #[test]
    fn test_negative_placement_pins_to_origin() {
        assert_eq!(clamp_placement(-40, -1, 10, 10, 100, 100), (0, 0));
    }

    #[test]
    fn test_overlay_size_preserves_aspect() {
        assert_eq!(overlay_size(50.0, 200, 100, false, 1000, 1000), (500, 250));
        // tall logo is shrunk to the container height
        assert_eq!(overlay_size(50.0, 100, 400, false, 1000, 1000), (250, 1000));
    }

    #[test]
    fn test_miter_trapezoid_top() {
        let outer = RectF::new(0.0, 0.0, 100.0, 80.0);
        let pts = miter_trapezoid(Side::Top, outer, 10.0);
        assert_eq!(pts[0], Point::new(0.0, 0.0));
        assert_eq!(pts[1], Point::new(100.0, 0.0));
        assert_eq!(pts[2], Point::new(90.0, 10.0));
        assert_eq!(pts[3], Point::new(10.0, 10.0));
    }

    #[test]
    fn test_miter_panels_share_corner_seams() {
        let outer = RectF::new(5.0, 5.0, 200.0, 120.0);
        let top = miter_trapezoid(Side::Top, outer, 12.0);
        let right = miter_trapezoid(Side::Right, outer, 12.0);
        let bottom = miter_trapezoid(Side::Bottom, outer, 12.0);
        let left = miter_trapezoid(Side::Left, outer, 12.0);

        // neighbouring panels meet along the same 45 degree seam
        assert_eq!((top[1], top[2]), (right[0], right[3]));
        assert_eq!((right[1], right[2]), (bottom[0], bottom[3]));
        assert_eq!((bottom[1], bottom[2]), (left[0], left[3]));
        assert_eq!((left[1], left[2]), (top[0], top[3]));

        // the seam is a true miter
        let dx = top[2].x - top[1].x;
        let dy = top[2].y - top[1].y;
        assert!((dx.abs() - dy.abs()).abs() < 1e-4);
    }

    #[test]
    fn test_inward_axis_points_at_photo() {
        let outer = RectF::new(0.0, 0.0, 100.0, 100.0);
        let (a, b) = Side::Bottom.inward_axis(outer, 20.0);
        assert_eq!(a.y, 100.0);
        assert_eq!(b.y, 80.0);
    }

    #[test]
    fn test_circle_and_ellipse() {
        let c = Circle::inscribed(RectF::new(10.0, 10.0, 40.0, 60.0));
        assert_eq!(c.radius, 20.0);
        assert_eq!(c.bounding_box(), RectF::new(10.0, 20.0, 40.0, 40.0));
        let p = c.point_at(0.0);
        assert!((p.x - 50.0).abs() < 1e-4);

        let e = Ellipse::covering(RectF::canvas(200, 100), 1.0);
        assert!((e.rx - 141.42136).abs() < 1e-3);
        assert!((e.ry - 70.71068).abs() < 1e-3);
    }
}
