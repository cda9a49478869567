//! # Dotted and Dashed Borders
//!
//! A contrasting band around the photo with a track of marks in the frame
//! color, walked clockwise from the top-left corner.

mod effect;

pub use effect::{Mark, PerimeterStyle};

/// Band width on every side
pub const PAD: u32 = 14;

/// Track distance from the outer edge
pub const TRACK_INSET: f32 = 7.0;

/// Dot radius and spacing along the track
pub const DOT_RADIUS: f32 = 4.0;
pub const DOT_SPACING: f32 = 14.0;

/// Dash length, the gap after it, and the stroke thickness
pub const DASH_ON: f32 = 20.0;
pub const DASH_OFF: f32 = 12.0;
pub const DASH_WIDTH: f32 = 5.0;
