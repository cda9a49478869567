//! # Layer Compositor
//!
//! The one primitive every effect is built from: take the current buffer and
//! an ordered list of layers, blend each layer in turn, and hand back the
//! result. The input buffer is consumed; nothing else is mutated.

pub mod adjust;
pub mod blur;
pub mod buffer;
pub mod layer;
pub mod vector;

pub use buffer::ImageBuffer;
pub use layer::{BlendMode, Layer, LayerContent};
pub use vector::{Brush, Geometry, Shape, ShapeStyle, Stop, VectorOverlay};

use tiny_skia::{FilterQuality, PixmapPaint, Transform};
use tracing::trace;

use crate::{
    color::{Rgb, Rgba},
    error::Result,
    geometry::{Insets, RectF},
};

/// Blend `layers` onto `base` in list order.
///
/// Raster layers only touch the pixels they cover, so a raster used with
/// `DestinationIn` or `Copy` should span the whole canvas. Vector layers are
/// always rasterized at canvas size.
pub fn composite<I>(base: ImageBuffer, layers: I) -> Result<ImageBuffer>
where
    I: IntoIterator<Item = Layer>,
{
    let mut canvas = base;
    let (width, height) = canvas.dimensions();

    for layer in layers {
        trace!("Compositing {} layer at ({}, {})", layer.blend, layer.offset_x, layer.offset_y);

        let paint = PixmapPaint {
            opacity: layer.opacity,
            blend_mode: layer.blend.to_skia(),
            quality: FilterQuality::Nearest,
        };

        match layer.content {
            LayerContent::Raster(image) => {
                canvas.pixmap_mut().draw_pixmap(
                    layer.offset_x,
                    layer.offset_y,
                    image.pixmap().as_ref(),
                    &paint,
                    Transform::identity(),
                    None,
                );
            }
            LayerContent::Vector(overlay) => {
                let rendered = overlay.rasterize(width, height, layer.offset_x as f32, layer.offset_y as f32)?;
                canvas
                    .pixmap_mut()
                    .draw_pixmap(0, 0, rendered.as_ref(), &paint, Transform::identity(), None);
            }
        }
    }

    Ok(canvas)
}

/// Grow the canvas by `insets`, filling the new area with `background`
pub fn extend(image: ImageBuffer, insets: Insets, background: Rgba) -> Result<ImageBuffer> {
    let width = image.width() + insets.horizontal();
    let height = image.height() + insets.vertical();
    let canvas = ImageBuffer::filled(width, height, background)?;
    composite(
        canvas,
        [Layer::raster(image).at(insets.left as i32, insets.top as i32)],
    )
}

/// Blend a flat color over the whole image
pub fn wash(image: ImageBuffer, color: Rgb, opacity: f32) -> Result<ImageBuffer> {
    let rect = RectF::canvas(image.width(), image.height());
    wash_region(image, rect, color, opacity)
}

/// Blend a flat color over one rectangle of the image
pub fn wash_region(image: ImageBuffer, rect: RectF, color: Rgb, opacity: f32) -> Result<ImageBuffer> {
    let overlay = VectorOverlay::new().with_shape(Shape::fill(Geometry::Rect(rect), Brush::Solid(color.opaque())));
    composite(image, [Layer::vector(overlay).opacity(opacity)])
}
