//! # Collaborators
//!
//! The engine's only I/O: fetching the base and overlay bytes, and handing
//! the encoded result to storage. Both sit behind traits so hosts and tests
//! can swap in their own transport.

pub mod fetch;
pub mod storage;

pub use fetch::{HttpImageSource, ImageSource};
pub use storage::{storage_key, ImageStore, LocalDirStore};
