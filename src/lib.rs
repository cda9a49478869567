//! # Brand-Compositor
//!
//! Server-side brand compositing: place a logo or portrait on a photo,
//! tint it, and wrap it in one of seventeen procedural frame styles.
//!
//! The crate is the engine only. A host hands it a request body and gets
//! back the output contract; fetching and storage go through the
//! [`ImageSource`](assets::ImageSource) and [`ImageStore`](assets::ImageStore)
//! collaborators.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use brand_compositor::{composition::CompositionEngine, config::Config};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = CompositionEngine::from_config(Config::default())?;
//! let response = engine
//!     .handle(br#"{"baseImageRef":"https://cdn.example/photo.jpg","frame":{"style":"gold"}}"#)
//!     .await;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`compositor`] - Image buffers, layers, blend modes and the layer compositor
//! - [`styles`] - Frame and effect styles, each built from compositor layers
//! - [`texture`] - Seeded grain and turbulence, scratch, leak and burn layouts
//! - [`composition`] - Request pipeline, timeout and persistence policy
//! - [`request`] - Wire model and validation
//! - [`assets`] - Fetch and storage collaborators
//! - [`config`] - Configuration management
//!
//! ## Creating Custom Styles
//!
//! You can create custom frame styles by implementing the [`Style`](styles::Style) trait:
//!
//! ```rust,no_run
//! use brand_compositor::{
//!     compositor::{extend, ImageBuffer},
//!     geometry::Insets,
//!     styles::{FrameParams, Style, StyleContext},
//!     Result,
//! };
//!
//! struct Passepartout;
//!
//! impl Style for Passepartout {
//!     fn name(&self) -> &str {
//!         "passepartout"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Wide mat in the frame color"
//!     }
//!
//!     fn apply(&self, image: ImageBuffer, params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
//!         extend(image, Insets::uniform(40), params.color.opaque())
//!     }
//! }
//! ```

pub mod assets;
pub mod color;
pub mod composition;
pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod request;
pub mod styles;
pub mod texture;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{ApiResponse, CompositionEngine},
    config::Config,
    error::{CompositorError, Result},
    request::CompositeRequest,
    styles::{FrameStyle, Style, StyleRegistry},
};
