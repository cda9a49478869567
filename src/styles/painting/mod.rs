//! # Gallery Frames
//!
//! Classic and wooden mouldings built as stacks of concentric mitered bands.
//! The classic frame also adds a glass reflection and an ivory mat; the
//! wooden frame carries procedural grain.

mod effect;

pub use effect::{PaintingKind, PaintingStyle};

/// Ivory mat between photo and moulding on the classic frame
pub const MAT_WIDTH: u32 = 24;

/// Moulding depth of the classic frame
pub const CLASSIC_DEPTH: u32 = 35;

/// Moulding depth of the wooden frame
pub const WOODEN_DEPTH: u32 = 24;

/// Grain lines drawn across the wooden moulding
pub const GRAIN_LINES: usize = 64;
