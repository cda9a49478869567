//! # Frame Style System
//!
//! Every frame style is a strategy that consumes the pipeline buffer and
//! returns a framed one, built entirely from compositor layers. Styles are
//! stateless; anything random comes from the per-request [`StyleContext`].
//!
//! ## Built-in Styles
//!
//! - **Borders**: thin, solid, thick, double, rounded
//! - **Gallery**: classic (antique gold with mat), wooden
//! - **Metallic**: gold, silver, copper
//! - **Perimeter**: dotted, dashed
//! - **Effects**: shadow, vignette, neon, filmstrip, polaroid
//!
//! ## Usage
//!
//! ```rust,no_run
//! use brand_compositor::styles::{FrameParams, FrameStyle, StyleContext, StyleRegistry};
//! use brand_compositor::{color::Rgb, compositor::ImageBuffer};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! # fn main() -> brand_compositor::Result<()> {
//! let registry = StyleRegistry::new();
//! let neon = registry.get(FrameStyle::Neon);
//!
//! let photo = ImageBuffer::filled(640, 480, Rgb::new(40, 40, 40).opaque())?;
//! let mut ctx = StyleContext::new(SmallRng::seed_from_u64(7));
//! let framed = neon.apply(photo, &FrameParams::new(neon.default_color()), &mut ctx)?;
//! # Ok(())
//! # }
//! ```

pub mod registry;
pub mod ring;
pub mod traits;

// Style implementations
pub mod border;
pub mod filmstrip;
pub mod metallic;
pub mod neon;
pub mod painting;
pub mod perimeter;
pub mod polaroid;
pub mod shadow;
pub mod vignette;

// Re-exports for convenience
pub use registry::{FrameStyle, StyleRegistry};
pub use traits::{CanvasGrowth, FrameParams, Style, StyleContext, StyleMetadata, DEFAULT_FRAME_COLOR};
