use std::fmt;

use rand::rngs::SmallRng;

use crate::{color::Rgb, compositor::ImageBuffer, error::Result};

/// Frame color used when a request names a style but no usable color
pub const DEFAULT_FRAME_COLOR: Rgb = Rgb::new(0x1F, 0x29, 0x37);

/// Core trait that all frame and effect styles implement
pub trait Style: Send + Sync {
    /// Returns the unique name of this style
    fn name(&self) -> &str;

    /// Returns a human-readable description of this style
    fn description(&self) -> &str;

    /// Apply the style to an image
    ///
    /// # Arguments
    ///
    /// * `image` - The current pipeline buffer, consumed
    /// * `params` - Resolved frame parameters from the request
    /// * `ctx` - Per-request resources such as the seeded texture source
    ///
    /// # Returns
    ///
    /// The framed image, which may be larger than the input.
    fn apply(&self, image: ImageBuffer, params: &FrameParams, ctx: &mut StyleContext) -> Result<ImageBuffer>;

    /// Whether this style colors the photo itself, making a separate
    /// whole-image tint redundant
    fn supplies_own_tint(&self) -> bool {
        false
    }

    /// Frame color when the request gives none
    fn default_color(&self) -> Rgb {
        DEFAULT_FRAME_COLOR
    }

    /// Get style-specific metadata
    fn metadata(&self) -> StyleMetadata {
        StyleMetadata::default()
    }
}

/// Parameters a style receives from the request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Frame color, already validated or defaulted
    pub color: Rgb,

    /// Vignette strength in 0.2..=1.0
    pub vignette_intensity: f32,
}

impl FrameParams {
    pub const DEFAULT_VIGNETTE_INTENSITY: f32 = 0.65;

    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            vignette_intensity: Self::DEFAULT_VIGNETTE_INTENSITY,
        }
    }

    /// Set the vignette strength; missing or non-finite values use the default
    pub fn with_vignette_intensity(mut self, intensity: Option<f32>) -> Self {
        self.vignette_intensity = match intensity {
            Some(v) if v.is_finite() => v.clamp(0.2, 1.0),
            _ => Self::DEFAULT_VIGNETTE_INTENSITY,
        };
        self
    }
}

/// Per-request resources shared by every style application
pub struct StyleContext {
    rng: SmallRng,
}

impl StyleContext {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }

    /// Seeded source for procedural textures
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

/// How a style changes the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasGrowth {
    /// Output has the input's dimensions
    #[default]
    None,
    /// Same padding on every side
    Uniform(u32),
    /// Padding depends on the input size or differs per side
    Variable,
}

impl CanvasGrowth {
    /// Output size for a `width x height` input, when it is fixed by the style
    pub fn output_size(self, width: u32, height: u32) -> Option<(u32, u32)> {
        match self {
            CanvasGrowth::None => Some((width, height)),
            CanvasGrowth::Uniform(pad) => Some((width + 2 * pad, height + 2 * pad)),
            CanvasGrowth::Variable => None,
        }
    }
}

impl fmt::Display for CanvasGrowth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasGrowth::None => f.write_str("same size"),
            CanvasGrowth::Uniform(pad) => write!(f, "+{}px each side", pad),
            CanvasGrowth::Variable => f.write_str("size-dependent"),
        }
    }
}

/// Metadata about a style's characteristics
#[derive(Debug, Clone, Default)]
pub struct StyleMetadata {
    /// Estimated performance impact (0.0 = minimal, 1.0 = heavy)
    pub performance_impact: f32,

    /// Whether the style draws from the seeded texture source
    pub procedural: bool,

    /// How the output canvas relates to the input
    pub growth: CanvasGrowth,
}
