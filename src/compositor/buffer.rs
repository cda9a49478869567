use std::io::Cursor;

use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, ColorType, DynamicImage, ImageOutputFormat,
    RgbImage, RgbaImage,
};
use tiny_skia::{ColorU8, IntSize, Pixmap, PremultipliedColorU8};

use crate::{
    color::{Rgb, Rgba},
    config::OutputFormat,
    error::{CompositingError, ImageRole, Result},
};

/// An RGBA raster owned by exactly one pipeline stage at a time
///
/// Pixels are stored premultiplied, which is what the rasterizer blends
/// in. Transforms take the buffer by value and hand back a new one.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    pixmap: Pixmap,
}

impl ImageBuffer {
    /// Create a fully transparent buffer
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(CompositingError::CanvasAllocation { width, height })?;
        Ok(Self { pixmap })
    }

    /// Create a buffer filled with a single color
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self> {
        let mut buffer = Self::new(width, height)?;
        buffer.pixmap.fill(color.to_skia());
        Ok(buffer)
    }

    /// Decode PNG or JPEG bytes
    pub fn decode(bytes: &[u8], role: ImageRole) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|e| CompositingError::DecodeFailed {
            role,
            reason: e.to_string(),
        })?;
        Self::from_rgba_image(&decoded.to_rgba8())
    }

    /// Import a straight-alpha RGBA image
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let mut buffer = Self::new(width, height)?;
        for (dst, src) in buffer.pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(buffer)
    }

    /// Export as a straight-alpha RGBA image
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Channels per pixel. Always RGBA internally.
    pub fn channel_count(&self) -> u8 {
        4
    }

    /// Whether any pixel is not fully opaque
    pub fn has_alpha(&self) -> bool {
        self.pixmap.pixels().iter().any(|p| p.alpha() < 255)
    }

    /// Straight-alpha color at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Rewrite every pixel through `f`, operating on straight alpha
    pub fn map_pixels<F>(mut self, f: F) -> Self
    where
        F: Fn(Rgba) -> Rgba,
    {
        for px in self.pixmap.pixels_mut() {
            let c = px.demultiply();
            let out = f(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()));
            *px = ColorU8::from_rgba(out.r, out.g, out.b, out.a).premultiply();
        }
        self
    }

    /// Resample to an exact size
    pub fn resize(&self, width: u32, height: u32) -> Result<Self> {
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }
        // Resampling premultiplied data with a non-overshooting filter keeps
        // every channel at or below its alpha.
        let resized = image::imageops::resize(&self.premultiplied_image(), width, height, FilterType::Triangle);
        Self::from_premultiplied_image(resized)
    }

    /// Scale to cover `width x height` and crop the overflow evenly
    pub fn cover_fit(&self, width: u32, height: u32) -> Result<Self> {
        let (sw, sh) = (self.width().max(1) as f64, self.height().max(1) as f64);
        let scale = (width as f64 / sw).max(height as f64 / sh);
        let scaled_w = ((sw * scale).ceil() as u32).max(width);
        let scaled_h = ((sh * scale).ceil() as u32).max(height);

        let scaled = image::imageops::resize(&self.premultiplied_image(), scaled_w, scaled_h, FilterType::Triangle);
        let x = (scaled_w - width) / 2;
        let y = (scaled_h - height) / 2;
        let cropped = image::imageops::crop_imm(&scaled, x, y, width, height).to_image();
        Self::from_premultiplied_image(cropped)
    }

    /// Composite onto an opaque background, dropping alpha
    pub fn flatten(&self, background: Rgb) -> RgbImage {
        let mut out = RgbImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let inv = 255 - src.alpha() as u32;
            let over = |c: u8, bg: u8| (c as u32 + (bg as u32 * inv + 127) / 255).min(255) as u8;
            *dst = image::Rgb([
                over(src.red(), background.r),
                over(src.green(), background.g),
                over(src.blue(), background.b),
            ]);
        }
        out
    }

    /// Flatten and encode for storage
    pub fn encode(&self, format: OutputFormat, jpeg_quality: u8, background: Rgb) -> Result<Vec<u8>> {
        let flat = self.flatten(background);
        let mut bytes = Vec::new();

        match format {
            OutputFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut bytes, jpeg_quality)
                    .encode(flat.as_raw(), flat.width(), flat.height(), ColorType::Rgb8)
                    .map_err(|e| CompositingError::EncodeFailed { reason: e.to_string() })?;
            }
            OutputFormat::Png => {
                DynamicImage::ImageRgb8(flat)
                    .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
                    .map_err(|e| CompositingError::EncodeFailed { reason: e.to_string() })?;
            }
        }

        Ok(bytes)
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    fn premultiplied_image(&self) -> RgbaImage {
        // data() is tightly packed RGBA, so the length always matches
        RgbaImage::from_raw(self.width(), self.height(), self.pixmap.data().to_vec())
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }

    fn from_premultiplied_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let size = IntSize::from_wh(width, height)
            .ok_or(CompositingError::CanvasAllocation { width, height })?;
        let pixmap = Pixmap::from_vec(image.into_raw(), size)
            .ok_or(CompositingError::CanvasAllocation { width, height })?;
        Ok(Self { pixmap })
    }
}

/// Premultiply a straight color for direct pixel writes
pub(crate) fn premultiplied(color: Rgba) -> PremultipliedColorU8 {
    ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply()
}
