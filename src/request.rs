//! # Composite Requests
//!
//! The inbound wire model and its one-time validation. Parsing is strict
//! about references (they must be durable, re-fetchable URLs) and lenient
//! about everything cosmetic: malformed colors are treated as absent and
//! unknown styles become `solid`.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    color::{self, Rgb},
    error::ValidationError,
    styles::FrameStyle,
};

/// Tint opacity when the request gives none
pub const DEFAULT_TINT_OPACITY: f32 = 0.3;

/// Request body as posted by the caller.
///
/// Field names follow the documented contract; the older names used by the
/// upload form (`imageUrl`, `logoUrl`, `position`, ...) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeRequest {
    #[serde(default, alias = "imageUrl")]
    pub base_image_ref: Option<String>,

    #[serde(default, alias = "logoUrl")]
    pub overlay_image_ref: Option<String>,

    #[serde(default, alias = "position")]
    pub overlay_placement: Option<Placement>,

    #[serde(default, alias = "isCircular")]
    pub overlay_is_circular: bool,

    #[serde(default, alias = "overlayBorderColor")]
    pub ring_color: Option<String>,

    /// Used for the ring when `ring_color` is absent or malformed
    #[serde(default)]
    pub brand_primary_color: Option<String>,

    #[serde(default, alias = "tintOverlay")]
    pub tint: Option<TintSpec>,

    #[serde(default)]
    pub frame: Option<FrameSpec>,

    #[serde(default, alias = "imageStyle")]
    pub mood_style: Option<String>,
}

/// Overlay position and size as percentages of the base image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(alias = "x")]
    pub x_pct: f32,

    #[serde(alias = "y")]
    pub y_pct: f32,

    #[serde(alias = "scale")]
    pub scale_pct: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TintSpec {
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSpec {
    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub vignette_intensity: Option<f32>,
}

/// Whole-image mood adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    None,
    Vintage,
    Artistic,
    Graffiti,
}

impl Mood {
    /// Lenient parse; anything unrecognized means no mood
    pub fn parse(name: &str) -> Mood {
        match name.trim().to_ascii_lowercase().as_str() {
            "vintage" => Mood::Vintage,
            "artistic" => Mood::Artistic,
            "graffiti" => Mood::Graffiti,
            "" | "none" => Mood::None,
            other => {
                debug!("Unknown mood style {:?}, ignoring", other);
                Mood::None
            }
        }
    }
}

/// Overlay after validation
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRequest {
    pub url: Url,
    pub placement: Placement,
    pub circular: bool,
    /// Ring drawn around circular overlays
    pub ring: Option<Rgb>,
}

/// Tint after validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub color: Rgb,
    pub opacity: f32,
}

/// Frame after validation. The color stays optional so the chosen style
/// can supply its own default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRequest {
    pub style: FrameStyle,
    pub color: Option<Rgb>,
    pub vignette_intensity: Option<f32>,
}

/// A request that passed validation; the orchestrator only ever sees these
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub base: Url,
    pub overlay: Option<OverlayRequest>,
    pub tint: Option<Tint>,
    pub frame: Option<FrameRequest>,
    pub mood: Mood,
}

impl CompositeRequest {
    /// Parse a JSON request body
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody { reason: e.to_string() })
    }

    /// Check required fields and references, resolving colors and defaults
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let base = check_reference("baseImageRef", self.base_image_ref.as_deref())?;

        let overlay = match non_empty(self.overlay_image_ref.as_deref()) {
            Some(raw) => Some(self.validate_overlay(raw)?),
            None => None,
        };

        let tint = self.tint.as_ref().and_then(|spec| {
            let color = spec.color.as_deref().and_then(color::parse_hex)?;
            Some(Tint { color, opacity: tint_opacity(spec.opacity) })
        });

        let frame = self.frame.as_ref().and_then(|spec| {
            let style = non_empty(spec.style.as_deref());
            let color = spec.color.as_deref().and_then(color::parse_hex);
            if style.is_none() && color.is_none() {
                return None;
            }
            Some(FrameRequest {
                style: style.map(FrameStyle::parse).unwrap_or_default(),
                color,
                vignette_intensity: spec.vignette_intensity,
            })
        });

        if overlay.is_none() && tint.is_none() && frame.is_none() {
            return Err(ValidationError::MissingField {
                field: "overlayImageRef, tint.color or frame".to_string(),
            });
        }

        let mood = self.mood_style.as_deref().map(Mood::parse).unwrap_or_default();

        Ok(ValidatedRequest { base, overlay, tint, frame, mood })
    }

    fn validate_overlay(&self, raw: &str) -> Result<OverlayRequest, ValidationError> {
        let url = check_reference("overlayImageRef", Some(raw))?;
        let placement = self.overlay_placement.ok_or_else(|| ValidationError::MissingField {
            field: "overlayPlacement".to_string(),
        })?;

        let finite = [placement.x_pct, placement.y_pct, placement.scale_pct].iter().all(|v| v.is_finite());
        if !finite || placement.scale_pct <= 0.0 {
            return Err(ValidationError::InvalidPlacement {
                details: format!(
                    "x={}, y={}, scale={} (scale must be a positive percentage)",
                    placement.x_pct, placement.y_pct, placement.scale_pct
                ),
            });
        }

        let ring = if self.overlay_is_circular {
            self.ring_color
                .as_deref()
                .and_then(color::parse_hex)
                .or_else(|| self.brand_primary_color.as_deref().and_then(color::parse_hex))
        } else {
            None
        };

        Ok(OverlayRequest { url, placement, circular: self.overlay_is_circular, ring })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Tint opacity: default when missing or non-finite, else clamped to `[0.1, 1.0]`
pub fn tint_opacity(opacity: Option<f32>) -> f32 {
    match opacity {
        Some(v) if v.is_finite() => v.clamp(0.1, 1.0),
        _ => DEFAULT_TINT_OPACITY,
    }
}

/// Accept only durable references the engine can fetch on its own
pub fn check_reference(field: &str, value: Option<&str>) -> Result<Url, ValidationError> {
    let raw = non_empty(value).ok_or_else(|| ValidationError::MissingField { field: field.to_string() })?;

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("blob:") || lowered.starts_with("data:") {
        return Err(ValidationError::EphemeralReference { field: field.to_string() });
    }

    let url = Url::parse(raw).map_err(|e| ValidationError::MalformedReference {
        field: field.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" | "file" => Ok(url),
        other => Err(ValidationError::MalformedReference {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
