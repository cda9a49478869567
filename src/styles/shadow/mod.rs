//! # Floating Print
//!
//! A thin border in the frame color, lifted off a pale surface by a stack
//! of progressively softer shadows and a contact shadow underneath.

mod effect;

pub use effect::ShadowStyle;

/// Border in the frame color around the photo
pub const BORDER: u32 = 5;

/// Surface visible around the print
pub const MARGIN: u32 = 48;

/// Shadow stack as (vertical offset, blur sigma, opacity), tightest first
pub const SHADOW_STACK: [(f32, f32, f32); 5] = [
    (1.0, 1.0, 0.12),
    (2.0, 3.0, 0.10),
    (4.0, 6.0, 0.08),
    (8.0, 12.0, 0.06),
    (16.0, 24.0, 0.05),
];
