//! # Procedural Texture Generator
//!
//! Film grain, scratches, dust, light leaks, burns and wood grain. Noise
//! fields draw from a caller-supplied seeded generator; the scratch, leak
//! and burn layouts are fixed tables scaled to the image size.

use rand::Rng;

use crate::{
    color::{Rgb, Rgba},
    compositor::{Brush, Geometry, ImageBuffer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{Circle, Ellipse, Point, RectF},
};

/// Near-vertical scratch: endpoints as fractions of the image, alpha, stroke width
struct Scratch {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    alpha: f32,
    width: f32,
}

const SCRATCHES: [Scratch; 7] = [
    Scratch { x1: 0.15, y1: 0.00, x2: 0.14, y2: 1.00, alpha: 0.35, width: 1.5 },
    Scratch { x1: 0.42, y1: 0.05, x2: 0.43, y2: 0.85, alpha: 0.28, width: 1.2 },
    Scratch { x1: 0.67, y1: 0.10, x2: 0.66, y2: 0.95, alpha: 0.30, width: 1.0 },
    Scratch { x1: 0.88, y1: 0.00, x2: 0.89, y2: 0.70, alpha: 0.22, width: 0.8 },
    Scratch { x1: 0.30, y1: 0.03, x2: 0.31, y2: 0.60, alpha: 0.20, width: 0.8 },
    Scratch { x1: 0.55, y1: 0.08, x2: 0.54, y2: 0.92, alpha: 0.18, width: 0.7 },
    Scratch { x1: 0.78, y1: 0.12, x2: 0.79, y2: 0.75, alpha: 0.16, width: 0.7 },
];

/// Dust mote: center as fractions, radius in pixels, alpha
struct Mote {
    cx: f32,
    cy: f32,
    radius: f32,
    alpha: f32,
}

const DUST: [Mote; 8] = [
    Mote { cx: 0.25, cy: 0.30, radius: 4.0, alpha: 0.25 },
    Mote { cx: 0.55, cy: 0.15, radius: 3.0, alpha: 0.22 },
    Mote { cx: 0.80, cy: 0.60, radius: 5.0, alpha: 0.20 },
    Mote { cx: 0.35, cy: 0.75, radius: 2.5, alpha: 0.25 },
    Mote { cx: 0.70, cy: 0.45, radius: 3.5, alpha: 0.20 },
    Mote { cx: 0.10, cy: 0.85, radius: 4.0, alpha: 0.18 },
    Mote { cx: 0.48, cy: 0.52, radius: 2.0, alpha: 0.20 },
    Mote { cx: 0.92, cy: 0.20, radius: 3.0, alpha: 0.15 },
];

/// Gradient stop: offset, color, alpha
type WarmStop = (f32, Rgb, f32);

/// Linear light leak: axis endpoints as fractions of the image
struct Leak {
    from: (f32, f32),
    to: (f32, f32),
    stops: [WarmStop; 3],
}

const LEAKS: [Leak; 2] = [
    Leak {
        from: (0.0, 0.3),
        to: (0.42, 0.5),
        stops: [
            (0.0, Rgb::new(255, 120, 50), 0.38),
            (0.45, Rgb::new(255, 180, 80), 0.15),
            (1.0, Rgb::new(255, 200, 100), 0.0),
        ],
    },
    Leak {
        from: (1.0, 0.0),
        to: (0.64, 0.36),
        stops: [
            (0.0, Rgb::new(255, 60, 60), 0.28),
            (0.35, Rgb::new(255, 140, 60), 0.10),
            (1.0, Rgb::new(255, 200, 100), 0.0),
        ],
    },
];

/// Radial burn: center as fractions, radius as a fraction of the longer side
struct Burn {
    cx: f32,
    cy: f32,
    radius: f32,
    stops: &'static [WarmStop],
}

const BURNS: [Burn; 3] = [
    Burn {
        cx: 0.03,
        cy: 0.5,
        radius: 0.38,
        stops: &[
            (0.0, Rgb::new(255, 140, 40), 0.42),
            (0.5, Rgb::new(255, 100, 20), 0.14),
            (1.0, Rgb::new(255, 100, 20), 0.0),
        ],
    },
    Burn {
        cx: 0.97,
        cy: 0.22,
        radius: 0.25,
        stops: &[(0.0, Rgb::new(255, 180, 80), 0.28), (1.0, Rgb::new(255, 180, 80), 0.0)],
    },
    Burn {
        cx: 0.5,
        cy: 0.98,
        radius: 0.28,
        stops: &[(0.0, Rgb::new(255, 120, 40), 0.20), (1.0, Rgb::new(255, 120, 40), 0.0)],
    },
];

fn warm_stops(stops: &[WarmStop]) -> Vec<Stop> {
    stops
        .iter()
        .map(|&(offset, color, alpha)| Stop::new(offset, color.with_opacity(alpha)))
        .collect()
}

/// Independent uniform grey per pixel at a fixed alpha
pub fn grain_field<R: Rng>(width: u32, height: u32, alpha: u8, rng: &mut R) -> Result<ImageBuffer> {
    let mut buffer = ImageBuffer::new(width, height)?;
    for px in buffer.pixmap_mut().pixels_mut() {
        let luma: u8 = rng.gen();
        *px = crate::compositor::buffer::premultiplied(Rgba::new(luma, luma, luma, alpha));
    }
    Ok(buffer)
}

/// Low-frequency value noise (two octaves), used for paper-like mottling
pub fn turbulence_field<R: Rng>(width: u32, height: u32, alpha: u8, rng: &mut R) -> Result<ImageBuffer> {
    let octaves = [(24.0f32, 0.65f32), (7.0, 0.35)];
    let lattices: Vec<(f32, ValueLattice)> = octaves
        .iter()
        .map(|&(cell, weight)| (weight, ValueLattice::new(width, height, cell, rng)))
        .collect();

    let mut buffer = ImageBuffer::new(width, height)?;
    let w = width as usize;
    for (i, px) in buffer.pixmap_mut().pixels_mut().iter_mut().enumerate() {
        let (x, y) = ((i % w) as f32, (i / w) as f32);
        let value: f32 = lattices.iter().map(|(weight, lattice)| weight * lattice.sample(x, y)).sum();
        let luma = (value * 255.0).round().clamp(0.0, 255.0) as u8;
        *px = crate::compositor::buffer::premultiplied(Rgba::new(luma, luma, luma, alpha));
    }
    Ok(buffer)
}

/// Random values on a coarse grid, bilinearly interpolated with smoothstep
struct ValueLattice {
    cell: f32,
    cols: usize,
    values: Vec<f32>,
}

impl ValueLattice {
    fn new<R: Rng>(width: u32, height: u32, cell: f32, rng: &mut R) -> Self {
        let cols = (width as f32 / cell).ceil() as usize + 2;
        let rows = (height as f32 / cell).ceil() as usize + 2;
        let values = (0..cols * rows).map(|_| rng.gen::<f32>()).collect();
        Self { cell, cols, values }
    }

    fn sample(&self, x: f32, y: f32) -> f32 {
        let (gx, gy) = (x / self.cell, y / self.cell);
        let (ix, iy) = (gx.floor() as usize, gy.floor() as usize);
        let smooth = |t: f32| t * t * (3.0 - 2.0 * t);
        let (tx, ty) = (smooth(gx.fract()), smooth(gy.fract()));

        let v = |cx: usize, cy: usize| self.values.get(cy * self.cols + cx).copied().unwrap_or(0.5);
        let top = v(ix, iy) + (v(ix + 1, iy) - v(ix, iy)) * tx;
        let bottom = v(ix, iy + 1) + (v(ix + 1, iy + 1) - v(ix, iy + 1)) * tx;
        top + (bottom - top) * ty
    }
}

/// Scratches and dust motes, identical for every call at a given size
pub fn scratch_layer(width: u32, height: u32) -> VectorOverlay {
    let (w, h) = (width as f32, height as f32);
    let mut overlay = VectorOverlay::new();

    for s in &SCRATCHES {
        overlay.push(Shape::stroke(
            Geometry::Line {
                from: Point::new(s.x1 * w, s.y1 * h),
                to: Point::new(s.x2 * w, s.y2 * h),
            },
            Brush::Solid(Rgb::WHITE.with_opacity(s.alpha)),
            s.width,
        ));
    }

    for m in &DUST {
        overlay.push(Shape::fill(
            Geometry::Circle(Circle { center: Point::new(m.cx * w, m.cy * h), radius: m.radius }),
            Brush::Solid(Rgb::WHITE.with_opacity(m.alpha)),
        ));
    }

    overlay
}

/// Warm linear light leaks entering from the left edge and the top-right corner
pub fn light_leaks(width: u32, height: u32) -> VectorOverlay {
    let (w, h) = (width as f32, height as f32);
    let area = Geometry::Rect(RectF::canvas(width, height));

    VectorOverlay::from_shapes(
        LEAKS
            .iter()
            .map(|leak| {
                Shape::fill(
                    area.clone(),
                    Brush::Linear {
                        start: Point::new(leak.from.0 * w, leak.from.1 * h),
                        end: Point::new(leak.to.0 * w, leak.to.1 * h),
                        stops: warm_stops(&leak.stops),
                    },
                )
            })
            .collect(),
    )
}

/// Radial burns anchored at the left edge, the top-right and the bottom edge
pub fn film_burns(width: u32, height: u32) -> VectorOverlay {
    let (w, h) = (width as f32, height as f32);
    let longest = w.max(h);
    let area = Geometry::Rect(RectF::canvas(width, height));

    VectorOverlay::from_shapes(
        BURNS
            .iter()
            .map(|burn| {
                let ellipse = Ellipse {
                    center: Point::new(burn.cx * w, burn.cy * h),
                    rx: burn.radius * longest,
                    ry: burn.radius * longest,
                };
                Shape::fill(area.clone(), Brush::radial(ellipse, warm_stops(burn.stops)))
            })
            .collect(),
    )
}

/// Thin diagonal grain strokes with random opacity and width, clipped to the
/// ring between `outer` and `inner`
pub fn wood_grain<R: Rng>(outer: RectF, inner: RectF, count: usize, color: Rgb, rng: &mut R) -> VectorOverlay {
    let span = outer.width + outer.height;
    let mut overlay = VectorOverlay::new();

    for i in 0..count {
        // spread line origins along the diagonal, jittered within each slot
        let slot = span / count.max(1) as f32;
        let t = (i as f32 + rng.gen_range(0.0..1.0)) * slot;
        let from = Point::new(outer.x + t - outer.height, outer.y);
        let drift = rng.gen_range(-0.15..0.15) * outer.height;
        let to = Point::new(from.x + outer.height + drift, outer.bottom());

        overlay.push(Shape::stroke(
            Geometry::Line { from, to },
            Brush::Solid(color.with_opacity(rng.gen_range(0.05..0.22))),
            rng.gen_range(0.5..1.6),
        ));
    }

    overlay.clipped(Geometry::rect_ring(outer, inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_grain_field_alpha_is_fixed() {
        let mut rng = SmallRng::seed_from_u64(1);
        let grain = grain_field(32, 16, 85, &mut rng).unwrap();
        assert_eq!(grain.dimensions(), (32, 16));
        for y in 0..16 {
            for x in 0..32 {
                let px = grain.pixel(x, y).unwrap();
                assert_eq!(px.a, 85);
                assert!(px.r.abs_diff(px.g) <= 1 && px.g.abs_diff(px.b) <= 1);
            }
        }
    }

    #[test]
    fn test_grain_field_is_seed_deterministic() {
        let a = grain_field(20, 20, 85, &mut SmallRng::seed_from_u64(9)).unwrap();
        let b = grain_field(20, 20, 85, &mut SmallRng::seed_from_u64(9)).unwrap();
        let c = grain_field(20, 20, 85, &mut SmallRng::seed_from_u64(10)).unwrap();
        assert_eq!(a.pixmap().data(), b.pixmap().data());
        assert_ne!(a.pixmap().data(), c.pixmap().data());
    }

    #[test]
    fn test_grain_field_is_not_flat() {
        let grain = grain_field(64, 64, 255, &mut SmallRng::seed_from_u64(2)).unwrap();
        let first = grain.pixel(0, 0).unwrap().r;
        assert!((0..64).any(|x| grain.pixel(x, 10).unwrap().r != first));
    }

    #[test]
    fn test_scratch_layer_is_deterministic_and_scales() {
        let small = scratch_layer(100, 100);
        let again = scratch_layer(100, 100);
        assert_eq!(small, again);
        assert_eq!(small.shapes.len(), SCRATCHES.len() + DUST.len());

        let large = scratch_layer(200, 100);
        match (&small.shapes[0].geometry, &large.shapes[0].geometry) {
            (Geometry::Line { from: a, .. }, Geometry::Line { from: b, .. }) => {
                assert!((b.x - a.x * 2.0).abs() < 1e-3);
                assert_eq!(b.y, a.y);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_leaks_and_burns_are_warm_and_fade_out() {
        for overlay in [light_leaks(300, 200), film_burns(300, 200)] {
            for shape in &overlay.shapes {
                let stops = match &shape.brush {
                    Brush::Linear { stops, .. } | Brush::Radial { stops, .. } => stops,
                    Brush::Solid(_) => panic!("expected a gradient"),
                };
                let first = stops[0].color;
                assert!(first.r >= first.g && first.g >= first.b, "not warm: {first:?}");
                assert_eq!(stops.last().map(|s| s.color.a), Some(0));
            }
        }
    }

    #[test]
    fn test_wood_grain_is_clipped_to_ring() {
        let outer = RectF::canvas(100, 80);
        let inner = outer.inset(10.0);
        let grain = wood_grain(outer, inner, 64, Rgb::new(61, 40, 23), &mut SmallRng::seed_from_u64(4));
        assert_eq!(grain.shapes.len(), 64);
        assert_eq!(grain.clip, Some(Geometry::rect_ring(outer, inner)));

        let pixmap = grain.rasterize(100, 80, 0.0, 0.0).unwrap();
        assert_eq!(pixmap.pixel(50, 40).unwrap().alpha(), 0);
    }

    #[test]
    fn test_turbulence_varies_smoothly() {
        let field = turbulence_field(96, 96, 40, &mut SmallRng::seed_from_u64(5)).unwrap();
        let a = field.pixel(10, 10).unwrap().r as i32;
        let b = field.pixel(11, 10).unwrap().r as i32;
        assert!((a - b).abs() < 40);
        assert_eq!(field.pixel(50, 50).unwrap().a, 40);
    }
}
