//! # Film Strip
//!
//! The photo becomes a frame of 35mm stock: black strips punched with
//! sprocket holes above and below, black side rails, then grain, scratches,
//! dust, light leaks, edge burns and a warm cast over everything.

mod effect;

pub use effect::FilmstripStyle;

use crate::color::Rgb;

/// Strip height above and below the photo
pub const STRIP_HEIGHT: u32 = 24;

/// Rail width left and right of the photo
pub const RAIL_WIDTH: u32 = 16;

/// Sprocket hole size, the gap between holes, and the hole's top offset
/// inside its strip
pub const HOLE_WIDTH: f32 = 8.0;
pub const HOLE_HEIGHT: f32 = 12.0;
pub const HOLE_GAP: f32 = 8.0;
pub const HOLE_TOP: f32 = 6.0;

/// Backlight showing through the sprocket holes
pub const HOLE_COLOR: Rgb = Rgb::new(232, 232, 232);

/// Alpha of the per-pixel grain layer
pub const GRAIN_ALPHA: u8 = 85;

/// Number of sprocket holes that fit across a strip of `width` pixels
pub fn hole_count(width: u32) -> u32 {
    let pitch = HOLE_WIDTH + HOLE_GAP;
    ((width as f32 - HOLE_GAP) / pitch).floor().max(0.0) as u32
}
