use std::sync::Arc;

use chrono::Utc;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::{json, Value};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    assets::{storage_key, HttpImageSource, ImageSource, ImageStore, LocalDirStore},
    composition::pipeline,
    compositor::ImageBuffer,
    config::{Config, OutputConfig},
    error::{CompositingError, CompositorError, ImageRole, PersistenceError, Result, StorageError},
    request::{CompositeRequest, ValidatedRequest},
    styles::{StyleContext, StyleRegistry},
};

/// Status and JSON body of the output contract
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn success(url: &str) -> Self {
        Self { status: 200, body: json!({ "url": url, "success": true }) }
    }

    fn failure(err: &CompositorError) -> Self {
        Self { status: err.status_code(), body: json!({ "error": err.user_message() }) }
    }
}

/// Main engine that turns one composite request into one stored image
///
/// The engine follows a strict linear flow:
/// 1. Validation - reject bad requests before any I/O
/// 2. Fetch - base image, then overlay, no retries
/// 3. Render - the compositing pipeline on a blocking worker
/// 4. Encode - flatten and encode per the output settings
/// 5. Persist - primary store, retried once on the secondary
///
/// Steps 2-4 run under one overall timeout. The hand-off in step 5 only
/// starts while budget remains and is never cancelled once started, so a
/// request that reports a timeout has stored nothing.
pub struct CompositionEngine<S, T> {
    config: Config,
    source: S,
    primary: T,
    secondary: Option<T>,
    registry: Arc<StyleRegistry>,
}

impl CompositionEngine<HttpImageSource, LocalDirStore> {
    /// Build an engine with the HTTP fetcher and directory stores from config
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let source = HttpImageSource::new(&config.fetch)?;
        let primary = LocalDirStore::from_config(&config.storage.primary);
        let secondary = config.storage.secondary.as_ref().map(LocalDirStore::from_config);
        Ok(Self::new(config, source, primary, secondary))
    }
}

impl<S: ImageSource, T: ImageStore> CompositionEngine<S, T> {
    pub fn new(config: Config, source: S, primary: T, secondary: Option<T>) -> Self {
        Self {
            config,
            source,
            primary,
            secondary,
            registry: Arc::new(StyleRegistry::new()),
        }
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Parse a POST body and render the output contract
    pub async fn handle(&self, body: &[u8]) -> ApiResponse {
        let result = match CompositeRequest::from_json(body) {
            Ok(request) => self.composite(&request).await,
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(url) => ApiResponse::success(&url),
            Err(err) => {
                warn!("Composite request failed: {}", err);
                ApiResponse::failure(&err)
            }
        }
    }

    /// Validate, fetch, render, encode and store. Returns the public URL.
    pub async fn composite(&self, request: &CompositeRequest) -> Result<String> {
        let validated = request.validate()?;
        let budget = self.config.engine.request_timeout();
        let deadline = Instant::now() + budget;
        let timed_out = || CompositorError::Timeout { seconds: budget.as_secs() };

        info!("🎨 Starting composite for {}", validated.base);
        let encoded = tokio::time::timeout_at(deadline, self.prepare(validated))
            .await
            .map_err(|_| timed_out())??;

        // the upload is the commit point
        if Instant::now() >= deadline {
            warn!("Budget spent before upload, discarding {} encoded bytes", encoded.len());
            return Err(timed_out());
        }

        let url = self.persist(&encoded).await?;
        info!("🎉 Composite stored at {}", url);
        Ok(url)
    }

    /// Fetch, render and encode
    async fn prepare(&self, request: ValidatedRequest) -> Result<Vec<u8>> {
        // Step 1: fetch, base first; the first failure ends the request
        let base = self.source.fetch(&request.base, ImageRole::Base).await?;
        let overlay = match &request.overlay {
            Some(wanted) => Some(self.source.fetch(&wanted.url, ImageRole::Overlay).await?),
            None => None,
        };

        // Step 2: render and encode off the async runtime
        let registry = Arc::clone(&self.registry);
        let output = self.config.output.clone();
        let rng = match self.config.engine.grain_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        tokio::task::spawn_blocking(move || {
            render_and_encode(&request, &base, overlay.as_deref(), &registry, &output, rng)
        })
        .await
        .map_err(|e| CompositingError::WorkerPanicked { reason: e.to_string() })?
    }

    async fn persist(&self, bytes: &[u8]) -> Result<String> {
        let output = &self.config.output;
        let key = storage_key(output, Utc::now());
        let content_type = output.format.content_type();

        let first = match self.primary.put(&key, bytes, content_type).await {
            Ok(url) => return Ok(url),
            Err(err) => err,
        };
        warn!("Primary storage at {} failed: {}", self.primary.location(), first);

        let fallback = self.secondary.as_ref().unwrap_or(&self.primary);
        debug!("Retrying upload on {}", fallback.location());

        match fallback.put(&key, bytes, content_type).await {
            Ok(url) => Ok(url),
            Err(second) => {
                warn!("Storage retry at {} failed: {}", fallback.location(), second);
                let location_missing = missing_location(&first).or_else(|| missing_location(&second));
                Err(PersistenceError::Exhausted { location_missing, reason: second.to_string() }.into())
            }
        }
    }
}

fn missing_location(err: &StorageError) -> Option<String> {
    match err {
        StorageError::LocationMissing { location } => Some(location.clone()),
        _ => None,
    }
}

fn render_and_encode(
    request: &ValidatedRequest,
    base: &[u8],
    overlay: Option<&[u8]>,
    registry: &StyleRegistry,
    output: &OutputConfig,
    rng: SmallRng,
) -> Result<Vec<u8>> {
    let base = ImageBuffer::decode(base, ImageRole::Base)?;
    let overlay = overlay.map(|bytes| ImageBuffer::decode(bytes, ImageRole::Overlay)).transpose()?;

    let mut ctx = StyleContext::new(rng);
    let image = pipeline::render(request, base, overlay, registry, &mut ctx)?;
    debug!("Encoding {}x{} output as {:?}", image.width(), image.height(), output.format);

    image.encode(output.format, output.jpeg_quality, output.background_rgb())
}
