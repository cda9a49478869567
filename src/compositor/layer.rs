use std::{fmt, str::FromStr};

use crate::{
    compositor::{buffer::ImageBuffer, vector::VectorOverlay},
    error::CompositingError,
};

/// How a layer's pixels combine with what is beneath them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard alpha-over
    Over,
    /// Per-channel multiply
    Multiply,
    /// Inverse multiply of inverses, for glow and light spill
    Screen,
    /// Additive (lighter) variant of screen
    ScreenAdditive,
    /// Contrast-preserving mix used for grain
    Overlay,
    /// Keep the base only where the layer has alpha
    DestinationIn,
    /// Replace the base under the layer
    Copy,
}

impl BlendMode {
    pub const ALL: [BlendMode; 7] = [
        BlendMode::Over,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::ScreenAdditive,
        BlendMode::Overlay,
        BlendMode::DestinationIn,
        BlendMode::Copy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Over => "over",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::ScreenAdditive => "screen-additive",
            BlendMode::Overlay => "overlay",
            BlendMode::DestinationIn => "dest-in",
            BlendMode::Copy => "copy",
        }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::BlendMode {
        match self {
            BlendMode::Over => tiny_skia::BlendMode::SourceOver,
            BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
            BlendMode::Screen => tiny_skia::BlendMode::Screen,
            BlendMode::ScreenAdditive => tiny_skia::BlendMode::Plus,
            BlendMode::Overlay => tiny_skia::BlendMode::Overlay,
            BlendMode::DestinationIn => tiny_skia::BlendMode::DestinationIn,
            BlendMode::Copy => tiny_skia::BlendMode::Source,
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = CompositingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "over" | "source-over" => Ok(BlendMode::Over),
            "multiply" => Ok(BlendMode::Multiply),
            "screen" => Ok(BlendMode::Screen),
            "screen-additive" | "add" | "lighter" | "plus" => Ok(BlendMode::ScreenAdditive),
            "overlay" => Ok(BlendMode::Overlay),
            "dest-in" | "destination-in" => Ok(BlendMode::DestinationIn),
            "copy" | "source" => Ok(BlendMode::Copy),
            _ => Err(CompositingError::UnsupportedBlendMode { mode: s.to_string() }),
        }
    }
}

/// What a layer carries
#[derive(Clone, Debug)]
pub enum LayerContent {
    Raster(ImageBuffer),
    Vector(VectorOverlay),
}

/// One compositing step: content, where it goes, and how it blends
///
/// Layers live only for the duration of a single `composite` call.
#[derive(Clone, Debug)]
pub struct Layer {
    pub content: LayerContent,
    pub offset_x: i32,
    pub offset_y: i32,
    pub blend: BlendMode,
    pub opacity: f32,
}

impl Layer {
    pub fn raster(image: ImageBuffer) -> Self {
        Self::with_content(LayerContent::Raster(image))
    }

    pub fn vector(overlay: VectorOverlay) -> Self {
        Self::with_content(LayerContent::Vector(overlay))
    }

    fn with_content(content: LayerContent) -> Self {
        Self {
            content,
            offset_x: 0,
            offset_y: 0,
            blend: BlendMode::Over,
            opacity: 1.0,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = crate::color::clamp_unit(opacity);
        self
    }
}
