use std::fmt;

use tracing::debug;

use crate::styles::{
    border::{BorderStyle, BorderVariant},
    filmstrip::FilmstripStyle,
    metallic::{Metal, MetallicStyle},
    neon::NeonStyle,
    painting::{PaintingKind, PaintingStyle},
    perimeter::{Mark, PerimeterStyle},
    polaroid::PolaroidStyle,
    shadow::ShadowStyle,
    vignette::VignetteStyle,
    Style,
};

/// Every frame style the engine knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStyle {
    Thin,
    Solid,
    Thick,
    Double,
    Rounded,
    Classic,
    Wooden,
    Shadow,
    Vignette,
    Neon,
    Filmstrip,
    Polaroid,
    Dotted,
    Dashed,
    Gold,
    Silver,
    Copper,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 17] = [
        FrameStyle::Thin,
        FrameStyle::Solid,
        FrameStyle::Thick,
        FrameStyle::Double,
        FrameStyle::Rounded,
        FrameStyle::Classic,
        FrameStyle::Wooden,
        FrameStyle::Shadow,
        FrameStyle::Vignette,
        FrameStyle::Neon,
        FrameStyle::Filmstrip,
        FrameStyle::Polaroid,
        FrameStyle::Dotted,
        FrameStyle::Dashed,
        FrameStyle::Gold,
        FrameStyle::Silver,
        FrameStyle::Copper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameStyle::Thin => "thin",
            FrameStyle::Solid => "solid",
            FrameStyle::Thick => "thick",
            FrameStyle::Double => "double",
            FrameStyle::Rounded => "rounded",
            FrameStyle::Classic => "classic",
            FrameStyle::Wooden => "wooden",
            FrameStyle::Shadow => "shadow",
            FrameStyle::Vignette => "vignette",
            FrameStyle::Neon => "neon",
            FrameStyle::Filmstrip => "filmstrip",
            FrameStyle::Polaroid => "polaroid",
            FrameStyle::Dotted => "dotted",
            FrameStyle::Dashed => "dashed",
            FrameStyle::Gold => "gold",
            FrameStyle::Silver => "silver",
            FrameStyle::Copper => "copper",
        }
    }

    /// Exact, case-insensitive lookup
    pub fn lookup(name: &str) -> Option<FrameStyle> {
        let name = name.trim();
        Self::ALL.into_iter().find(|style| style.as_str().eq_ignore_ascii_case(name))
    }

    /// Lenient parse: anything unrecognized becomes `Solid`
    pub fn parse(name: &str) -> FrameStyle {
        Self::lookup(name).unwrap_or_else(|| {
            debug!("Unknown frame style {:?}, using solid", name);
            FrameStyle::Solid
        })
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        FrameStyle::Solid
    }
}

impl fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry of style strategies, one per `FrameStyle`
///
/// Strategies are stateless, so one registry can serve every request.
/// Entries are stored in `FrameStyle::ALL` order and indexed by variant.
pub struct StyleRegistry {
    styles: Vec<Box<dyn Style>>,
}

impl StyleRegistry {
    /// Create a registry holding all built-in styles
    pub fn new() -> Self {
        let styles = FrameStyle::ALL.into_iter().map(Self::builtin).collect();
        Self { styles }
    }

    fn builtin(style: FrameStyle) -> Box<dyn Style> {
        match style {
            FrameStyle::Thin => Box::new(BorderStyle::new(BorderVariant::Thin)),
            FrameStyle::Solid => Box::new(BorderStyle::new(BorderVariant::Solid)),
            FrameStyle::Thick => Box::new(BorderStyle::new(BorderVariant::Thick)),
            FrameStyle::Double => Box::new(BorderStyle::new(BorderVariant::Double)),
            FrameStyle::Rounded => Box::new(BorderStyle::new(BorderVariant::Rounded)),
            FrameStyle::Classic => Box::new(PaintingStyle::new(PaintingKind::Classic)),
            FrameStyle::Wooden => Box::new(PaintingStyle::new(PaintingKind::Wooden)),
            FrameStyle::Shadow => Box::new(ShadowStyle::new()),
            FrameStyle::Vignette => Box::new(VignetteStyle::new()),
            FrameStyle::Neon => Box::new(NeonStyle::new()),
            FrameStyle::Filmstrip => Box::new(FilmstripStyle::new()),
            FrameStyle::Polaroid => Box::new(PolaroidStyle::new()),
            FrameStyle::Dotted => Box::new(PerimeterStyle::new(Mark::Dot)),
            FrameStyle::Dashed => Box::new(PerimeterStyle::new(Mark::Dash)),
            FrameStyle::Gold => Box::new(MetallicStyle::new(Metal::Gold)),
            FrameStyle::Silver => Box::new(MetallicStyle::new(Metal::Silver)),
            FrameStyle::Copper => Box::new(MetallicStyle::new(Metal::Copper)),
        }
    }

    /// Strategy for a style
    pub fn get(&self, style: FrameStyle) -> &dyn Style {
        self.styles[style as usize].as_ref()
    }

    /// Strategy for a style name, falling back to solid
    pub fn resolve(&self, name: &str) -> &dyn Style {
        self.get(FrameStyle::parse(name))
    }

    /// Get all available style names
    pub fn available_styles(&self) -> Vec<&'static str> {
        FrameStyle::ALL.iter().map(FrameStyle::as_str).collect()
    }

    /// Check if a style name is recognized
    pub fn has_style(&self, name: &str) -> bool {
        FrameStyle::lookup(name).is_some()
    }

    /// Get the number of registered styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
