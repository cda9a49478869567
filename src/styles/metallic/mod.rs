//! # Metallic Frames
//!
//! Gold, silver and copper mouldings: the photo takes a faint wash of the
//! metal, then sits inside four mitered panels lit from the top-left, with
//! specular streaks, corner seams, an inner bevel, and a wall shadow.

mod effect;

pub use effect::{Metal, MetallicStyle};

/// Depth of the moulding
pub const FRAME_WIDTH: u32 = 26;

/// Wall visible around the frame
pub const WALL_MARGIN: u32 = 24;

/// Lip shadow cast onto the photo, and the highlight opposite it
pub const BEVEL_SHADOW: f32 = 6.0;
pub const BEVEL_HIGHLIGHT: f32 = 3.0;
