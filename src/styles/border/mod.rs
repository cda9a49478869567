//! # Border Styles
//!
//! Flat padding in the frame color: thin, solid and thick with softly
//! rounded outer corners, a white double-rule border, and a strongly rounded
//! variant.

mod effect;

pub use effect::{BorderStyle, BorderVariant};

/// Padding per side for thin, solid and thick borders
pub const THIN_PAD: u32 = 3;
pub const SOLID_PAD: u32 = 8;
pub const THICK_PAD: u32 = 16;

/// Upper bound on the corner radius of the flat borders
pub const MAX_CORNER_RADIUS: f32 = 28.0;

/// Corner radius as a multiple of the padding
pub const CORNER_RADIUS_FACTOR: f32 = 1.8;

/// Double border: white padding with two thin rules in the frame color
pub const DOUBLE_PAD: u32 = 20;
pub const DOUBLE_LINE_WIDTH: f32 = 2.0;
pub const DOUBLE_OUTER_INSET: f32 = 1.0;
pub const DOUBLE_GAP: f32 = 8.0;

/// Rounded border
pub const ROUNDED_PAD: u32 = 12;
pub const ROUNDED_RADIUS: f32 = 24.0;
