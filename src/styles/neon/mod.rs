//! # Neon Tube
//!
//! The photo is dimmed and lit from its edges by the tube color, then set
//! in a dark surround with a glowing rounded tube. The glow is a stack of
//! blurred strokes from wide and faint to narrow and bright, finished with
//! a white-hot core.

mod effect;

pub use effect::NeonStyle;

use crate::color::Rgb;

/// Tube color when the request gives none
pub const DEFAULT_NEON: Rgb = Rgb::new(0xFF, 0x2B, 0xD6);

/// Dark surround added on every side
pub const SURROUND: u32 = 56;

/// Tube position inside the surround, and its corner radius
pub const TUBE_INSET: f32 = 18.0;
pub const TUBE_RADIUS: f32 = 14.0;

/// Bloom passes as (stroke width, blur sigma, opacity), widest first
pub const BLOOM: [(f32, f32, f32); 6] = [
    (52.0, 44.0, 0.28),
    (36.0, 28.0, 0.40),
    (22.0, 16.0, 0.55),
    (14.0, 9.0, 0.70),
    (7.0, 4.0, 0.85),
    (4.0, 1.5, 0.95),
];
