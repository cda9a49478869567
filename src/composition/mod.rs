//! # Compositing Orchestrator
//!
//! The engine validates a request, fetches its images, runs the stage
//! pipeline on a blocking worker and hands the encoded result to storage,
//! all under one request timeout.

pub mod engine;
pub mod pipeline;

// Re-exports for convenience
pub use engine::{ApiResponse, CompositionEngine};
pub use pipeline::{render, Stage};
