use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    color::{self, Rgb},
    error::{ConfigError, Result},
};

/// Main configuration for the brand compositor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fetch collaborator settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Pipeline settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Output encoding settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Storage collaborator settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.fetch.validate()?;
        self.engine.validate()?;
        self.output.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

/// Fetch collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Identifying header sent with every image GET
    pub user_agent: String,

    /// Per-fetch timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "BrandCompositor/{} (+https://github.com/brand-compositor)",
                env!("CARGO_PKG_VERSION")
            ),
            timeout_secs: 20,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingKey { key: "fetch.user_agent".to_string() }.into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_secs".to_string(),
                value: self.timeout_secs.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Overall budget for one request: fetches, compositing and storage
    pub request_timeout_secs: u64,

    /// Seed for procedural textures. Unset means a fresh entropy seed per request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            grain_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.request_timeout_secs".to_string(),
                value: self.request_timeout_secs.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Output encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Prefix for storage keys
    pub key_prefix: String,

    /// Hex color transparent regions are flattened onto before encoding
    pub background: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            jpeg_quality: 90,
            key_prefix: "composites".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl OutputConfig {
    /// Flattening color, falling back to white for malformed values
    pub fn background_rgb(&self) -> Rgb {
        color::parse_hex(&self.background).unwrap_or(Rgb::WHITE)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidValue {
                key: "output.jpeg_quality".to_string(),
                value: self.jpeg_quality.to_string()
            }.into());
        }

        if color::parse_hex(&self.background).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "output.background".to_string(),
                value: self.background.clone()
            }.into());
        }

        Ok(())
    }
}

/// One storage location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory uploads are written into
    pub root: PathBuf,

    /// Public URL prefix the root is served under
    pub public_base_url: String,
}

/// Storage collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub primary: StoreConfig,

    /// Fallback tried once when the primary upload fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<StoreConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            primary: StoreConfig {
                root: PathBuf::from("generated-images"),
                public_base_url: "http://localhost:8080/generated-images".to_string(),
            },
            secondary: None,
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let stores = std::iter::once(("storage.primary", &self.primary))
            .chain(self.secondary.iter().map(|s| ("storage.secondary", s)));

        for (key, store) in stores {
            if store.public_base_url.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    key: format!("{}.public_base_url", key)
                }.into());
            }

            if url::Url::parse(&store.public_base_url).is_err() {
                return Err(ConfigError::InvalidValue {
                    key: format!("{}.public_base_url", key),
                    value: store.public_base_url.clone()
                }.into());
            }
        }

        Ok(())
    }
}
