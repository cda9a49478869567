use thiserror::Error;

/// Main error type for the brand compositor
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Compositing error: {0}")]
    Compositing(#[from] CompositingError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request validation errors, raised before any fetch or compositing happens
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} is an ephemeral reference and cannot be re-fetched")]
    EphemeralReference { field: String },

    #[error("{field} is not a valid image reference: {reason}")]
    MalformedReference { field: String, reason: String },

    #[error("Invalid overlay placement: {details}")]
    InvalidPlacement { details: String },

    #[error("Malformed request body: {reason}")]
    MalformedBody { reason: String },
}

/// Which image a fetch was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Base,
    Overlay,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Base => f.write_str("base image"),
            ImageRole::Overlay => f.write_str("overlay image"),
        }
    }
}

/// Fetch collaborator errors. The first failure is terminal.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request for {role} failed: {reason}")]
    RequestFailed { role: ImageRole, reason: String },

    #[error("Fetching {role} returned HTTP {status}")]
    BadStatus { role: ImageRole, status: u16 },

    #[error("Reading {role} body failed: {reason}")]
    ReadFailed { role: ImageRole, reason: String },

    #[error("Reading local {role} at {path} failed: {reason}")]
    LocalReadFailed { role: ImageRole, path: String, reason: String },
}

impl FetchError {
    pub fn role(&self) -> ImageRole {
        match self {
            Self::RequestFailed { role, .. }
            | Self::BadStatus { role, .. }
            | Self::ReadFailed { role, .. }
            | Self::LocalReadFailed { role, .. } => *role,
        }
    }
}

/// Internal pipeline failures
#[derive(Error, Debug)]
pub enum CompositingError {
    #[error("Unsupported blend mode: {mode}")]
    UnsupportedBlendMode { mode: String },

    #[error("Failed to decode {role}: {reason}")]
    DecodeFailed { role: ImageRole, reason: String },

    #[error("Cannot allocate a {width}x{height} canvas")]
    CanvasAllocation { width: u32, height: u32 },

    #[error("Failed to encode output: {reason}")]
    EncodeFailed { reason: String },

    #[error("Style {style} failed: {reason}")]
    StyleFailed { style: String, reason: String },

    #[error("Compositing worker stopped unexpectedly: {reason}")]
    WorkerPanicked { reason: String },
}

/// Storage collaborator errors for a single attempt
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage location not found: {location}")]
    LocationMissing { location: String },

    #[error("Storage rejected the upload: {reason}")]
    Rejected { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised once both the primary and the secondary storage attempts failed
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("All storage attempts failed: {reason}")]
    Exhausted {
        location_missing: Option<String>,
        reason: String,
    },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// HTTP status code of the output contract
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Get a user-facing error message.
    ///
    /// Compositing failures are reported generically so decoder or
    /// rasterizer internals never reach the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Fetch(err) => match err.role() {
                ImageRole::Base => "Failed to fetch base image".to_string(),
                ImageRole::Overlay => "Failed to fetch overlay image".to_string(),
            },
            Self::Compositing(_) | Self::Io(_) | Self::Config(_) => {
                "Failed to process image".to_string()
            }
            Self::Persistence(PersistenceError::Exhausted {
                location_missing: Some(location),
                ..
            }) => {
                format!(
                    "Storage location '{}' is not set up. Create it and allow uploads.",
                    location
                )
            }
            Self::Persistence(PersistenceError::Exhausted { reason, .. }) => {
                format!("Failed to save image: {}", reason)
            }
            Self::Timeout { .. } => "Request timed out".to_string(),
        }
    }
}
