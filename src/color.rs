//! # Color Utility
//!
//! Hex parsing, luminance, and opacity blending for brand colors. Parsing is
//! fail-soft: malformed input yields `None` so callers fall back to a default
//! instead of rejecting the request.

use std::fmt;

/// Opaque sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, uppercase
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceived luminance on a 0-255 scale (`0.299R + 0.587G + 0.114B`)
    pub fn luminance(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    /// Attach an opacity in 0..1
    pub fn with_opacity(self, opacity: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, unit_to_u8(opacity))
    }

    pub fn opaque(self) -> Rgba {
        Rgba::new(self.r, self.g, self.b, 255)
    }

    /// Blend `top` over `self` at the given opacity
    pub fn blend(self, top: Rgb, opacity: f32) -> Rgb {
        let t = clamp_unit(opacity);
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
        Rgb::new(mix(self.r, top.r), mix(self.g, top.g), mix(self.b, top.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Straight-alpha sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Text tone that stays legible on a given background
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextTone {
    Black,
    White,
}

impl TextTone {
    pub fn rgb(self) -> Rgb {
        match self {
            TextTone::Black => Rgb::BLACK,
            TextTone::White => Rgb::WHITE,
        }
    }
}

/// Parse a `#RRGGBB` string. Anything else (short form, named colors,
/// missing `#`, surrounding whitespace) yields `None`.
pub fn parse_hex(s: &str) -> Option<Rgb> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Parse an optional hex string, falling back to `default` when absent or malformed
pub fn parse_hex_or(s: Option<&str>, default: Rgb) -> Rgb {
    s.and_then(parse_hex).unwrap_or(default)
}

/// Text tone for a background: black when luminance exceeds 128, white otherwise
pub fn contrast_text(bg: Rgb) -> TextTone {
    if bg.luminance() > 128.0 {
        TextTone::Black
    } else {
        TextTone::White
    }
}

pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}
