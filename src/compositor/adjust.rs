//! Per-pixel color adjustments used by the film and instant-photo looks.

use crate::{color::Rgba, compositor::buffer::ImageBuffer};

/// Scale saturation around Rec.601 luma. `1.0` is identity, `0.0` greyscale.
pub fn saturate(image: ImageBuffer, factor: f32) -> ImageBuffer {
    let factor = factor.max(0.0);
    image.map_pixels(|px| {
        let luma = 0.299 * px.r as f32 + 0.587 * px.g as f32 + 0.114 * px.b as f32;
        let channel = |c: u8| to_u8(luma + (c as f32 - luma) * factor);
        Rgba::new(channel(px.r), channel(px.g), channel(px.b), px.a)
    })
}

/// Multiply every channel by `factor`
pub fn brightness(image: ImageBuffer, factor: f32) -> ImageBuffer {
    let factor = factor.max(0.0);
    image.map_pixels(|px| {
        let channel = |c: u8| to_u8(c as f32 * factor);
        Rgba::new(channel(px.r), channel(px.g), channel(px.b), px.a)
    })
}

/// Shift color temperature toward amber: more red, a little more green, less blue
pub fn warm_tone(image: ImageBuffer, warmth: f32) -> ImageBuffer {
    let warmth = warmth.clamp(0.0, 1.0);
    image.map_pixels(|px| {
        Rgba::new(
            to_u8(px.r as f32 * (1.0 + warmth * 0.08)),
            to_u8(px.g as f32 * (1.0 + warmth * 0.03)),
            to_u8(px.b as f32 * (1.0 - warmth * 0.10)),
            px.a,
        )
    })
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
