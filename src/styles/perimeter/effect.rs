use tracing::debug;

use crate::{
    color::{contrast_text, Rgb},
    compositor::{composite, extend, Brush, Geometry, ImageBuffer, Layer, Shape, VectorOverlay},
    error::Result,
    geometry::{Circle, Insets, Point, RectF},
    styles::{
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
};

use super::{DASH_OFF, DASH_ON, DASH_WIDTH, DOT_RADIUS, DOT_SPACING, PAD, TRACK_INSET};

/// Mark repeated along the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Dot,
    Dash,
}

/// Border of repeated marks
pub struct PerimeterStyle {
    mark: Mark,
}

/// Track edges clockwise from the top-left corner
fn edges(track: RectF) -> [(Point, Point); 4] {
    [
        (track.top_left(), track.top_right()),
        (track.top_right(), track.bottom_right()),
        (track.bottom_right(), track.bottom_left()),
        (track.bottom_left(), track.top_left()),
    ]
}

fn lerp(from: Point, to: Point, t: f32) -> Point {
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}

fn length(from: Point, to: Point) -> f32 {
    (to.x - from.x).hypot(to.y - from.y)
}

impl PerimeterStyle {
    pub fn new(mark: Mark) -> Self {
        Self { mark }
    }

    /// Dot centers; each edge starts at its first corner and stops short of
    /// the next, so corners are never marked twice
    pub(crate) fn dot_centers(track: RectF) -> Vec<Point> {
        let mut centers = Vec::new();
        for (from, to) in edges(track) {
            let len = length(from, to);
            if len <= 0.0 {
                continue;
            }
            let mut d = 0.0;
            while d < len {
                centers.push(lerp(from, to, d / len));
                d += DOT_SPACING;
            }
        }
        centers
    }

    /// Dash segments, restarting the on/off pattern at each corner
    pub(crate) fn dash_segments(track: RectF) -> Vec<(Point, Point)> {
        let mut segments = Vec::new();
        for (from, to) in edges(track) {
            let len = length(from, to);
            let mut d = 0.0;
            while d < len {
                let end = (d + DASH_ON).min(len);
                segments.push((lerp(from, to, d / len), lerp(from, to, end / len)));
                d += DASH_ON + DASH_OFF;
            }
        }
        segments
    }

    fn marks(&self, track: RectF, color: Rgb) -> VectorOverlay {
        let brush = Brush::Solid(color.opaque());
        let shapes = match self.mark {
            Mark::Dot => Self::dot_centers(track)
                .into_iter()
                .map(|center| Shape::fill(Geometry::Circle(Circle { center, radius: DOT_RADIUS }), brush.clone()))
                .collect(),
            Mark::Dash => Self::dash_segments(track)
                .into_iter()
                .map(|(from, to)| Shape::stroke(Geometry::Line { from, to }, brush.clone(), DASH_WIDTH))
                .collect(),
        };
        VectorOverlay::from_shapes(shapes)
    }
}

impl Style for PerimeterStyle {
    fn name(&self) -> &str {
        match self.mark {
            Mark::Dot => "dotted",
            Mark::Dash => "dashed",
        }
    }

    fn description(&self) -> &str {
        match self.mark {
            Mark::Dot => "Contrasting band with a ring of dots in the frame color",
            Mark::Dash => "Contrasting band with a dashed rule in the frame color",
        }
    }

    fn apply(&self, image: ImageBuffer, params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let band = contrast_text(params.color).rgb();
        debug!("Applying {} border in {} on {}", self.name(), params.color.to_hex(), band.to_hex());

        let canvas = extend(image, Insets::uniform(PAD), band.opaque())?;
        let track = RectF::canvas(canvas.width(), canvas.height()).inset(TRACK_INSET);
        let marks = self.marks(track, params.color);
        composite(canvas, [Layer::vector(marks)])
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.15,
            procedural: false,
            growth: CanvasGrowth::Uniform(PAD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn apply(mark: Mark, color: Rgb) -> ImageBuffer {
        let photo = ImageBuffer::filled(72, 44, Rgb::new(50, 50, 50).opaque()).unwrap();
        PerimeterStyle::new(mark)
            .apply(photo, &FrameParams::new(color), &mut StyleContext::new(SmallRng::seed_from_u64(0)))
            .unwrap()
    }

    #[test]
    fn test_dot_walk_skips_end_corners() {
        let track = RectF::new(0.0, 0.0, 28.0, 14.0);
        let centers = PerimeterStyle::dot_centers(track);
        // top: 0,14; right: 0; bottom: 0,14; left: 0
        assert_eq!(centers.len(), 6);
        assert_eq!(centers[0], Point::new(0.0, 0.0));
        assert_eq!(centers[2], Point::new(28.0, 0.0));
        assert_eq!(centers.iter().filter(|p| **p == Point::new(0.0, 0.0)).count(), 1);
    }

    #[test]
    fn test_dash_pattern_truncates_at_corner() {
        let track = RectF::new(0.0, 0.0, 40.0, 10.0);
        let segments = PerimeterStyle::dash_segments(track);
        assert_eq!(segments[0], (Point::new(0.0, 0.0), Point::new(20.0, 0.0)));
        assert_eq!(segments[1], (Point::new(32.0, 0.0), Point::new(40.0, 0.0)));
        assert_eq!(segments[2], (Point::new(40.0, 0.0), Point::new(40.0, 10.0)));
    }

    #[test]
    fn test_band_contrasts_with_marks() {
        let out = apply(Mark::Dot, Rgb::new(20, 20, 120));
        assert_eq!(out.dimensions(), (100, 72));
        // band is white behind a dark frame color
        assert_eq!(out.pixel(14, 1), Some(Rgb::WHITE.opaque()));
        // first dot sits on the track corner
        assert_eq!(out.pixel(7, 7), Some(Rgb::new(20, 20, 120).opaque()));
    }

    #[test]
    fn test_marks_run_down_the_middle_of_the_band() {
        let track = RectF::canvas(100, 72).inset(TRACK_INSET);
        for center in PerimeterStyle::dot_centers(track) {
            let on_vertical = center.x == 7.0 || center.x == 93.0;
            let on_horizontal = center.y == 7.0 || center.y == 65.0;
            assert!(on_vertical || on_horizontal, "dot off the track at {center:?}");
        }

        let ink = Rgb::new(250, 240, 200).opaque();
        let band = Rgb::BLACK.opaque();
        let out = apply(Mark::Dash, Rgb::new(250, 240, 200));

        // top dash spans y 4.5..9.5, centred 7px in, inside the 14px band
        for y in 5..=8 {
            assert_eq!(out.pixel(17, y), Some(ink), "top y {y}");
        }
        assert_eq!(out.pixel(17, 2), Some(band));
        assert_eq!(out.pixel(17, 11), Some(band));

        // right edge at x 93, bottom edge at y 65
        for x in 91..=94 {
            assert_eq!(out.pixel(x, 15), Some(ink), "right x {x}");
        }
        assert_eq!(out.pixel(88, 15), Some(band));
        assert_eq!(out.pixel(98, 15), Some(band));
        assert_eq!(out.pixel(85, 65), Some(ink));
        assert_eq!(out.pixel(85, 60), Some(band));
        assert_eq!(out.pixel(85, 70), Some(band));
    }

    #[test]
    fn test_dashed_light_color_on_dark_band() {
        let out = apply(Mark::Dash, Rgb::new(250, 240, 200));
        assert_eq!(out.pixel(1, 40), Some(Rgb::BLACK.opaque()));
        assert_eq!(out.pixel(15, 7), Some(Rgb::new(250, 240, 200).opaque()));
        assert_eq!(out.pixel(36, 50), Some(Rgb::new(50, 50, 50).opaque()));
    }
}
