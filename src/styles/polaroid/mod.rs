//! # Instant Photo
//!
//! Warm, slightly faded print on a paper mount with the deep bottom margin
//! of an instant film, resting on a table with a soft shadow.

mod effect;

pub use effect::PolaroidStyle;

use crate::color::Rgb;

pub const PAPER: Rgb = Rgb::new(0xFA, 0xFA, 0xF7);

/// Smallest side margin, and the side margin as a fraction of photo width
pub const MIN_SIDE: u32 = 16;
pub const SIDE_FRACTION: f32 = 0.06;

/// Bottom margin as a multiple of the side margin
pub const BOTTOM_RATIO: f32 = 3.5;

/// Table visible around the print
pub const TABLE_MARGIN: u32 = 32;

/// Side and bottom paper margins for a photo `width` pixels wide
pub fn paper_margins(width: u32) -> (u32, u32) {
    let side = MIN_SIDE.max((SIDE_FRACTION * width as f32).round() as u32);
    let bottom = (BOTTOM_RATIO * side as f32).round() as u32;
    (side, bottom)
}
