//! # Vignette
//!
//! Darkens toward the corners with three stacked elliptical falloffs. The
//! canvas keeps its size and the center stays untouched.

mod effect;

pub use effect::VignetteStyle;

/// Each falloff as (ellipse scale, first stop, edge opacity factor, softened)
pub const FALLOFFS: [(f32, f32, f32, bool); 3] = [
    (1.0, 0.55, 0.35, false),
    (0.9, 0.70, 0.25, false),
    (1.1, 0.30, 0.45, true),
];

/// Blur applied to the softened falloff, as a fraction of the longer side
pub const SOFTEN_FRACTION: f32 = 0.02;
