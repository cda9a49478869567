use tracing::debug;

use crate::{
    color::{Rgb, Rgba},
    compositor::{composite, extend, wash, Brush, Geometry, ImageBuffer, Layer, Shape, Stop, VectorOverlay},
    error::Result,
    geometry::{Insets, Point, RectF},
    styles::{
        ring::{self, DropShadow, MouldingPalette},
        traits::{CanvasGrowth, FrameParams, StyleContext, StyleMetadata},
        Style,
    },
};

use super::{BEVEL_HIGHLIGHT, BEVEL_SHADOW, FRAME_WIDTH, WALL_MARGIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metal {
    Gold,
    Silver,
    Copper,
}

const fn hex(v: u32) -> Rgb {
    Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

impl Metal {
    /// Wash color and opacity applied to the photo
    pub fn tint(&self) -> (Rgb, f32) {
        match self {
            Metal::Gold => (Rgb::new(212, 175, 55), 0.22),
            Metal::Silver => (Rgb::new(200, 200, 208), 0.18),
            Metal::Copper => (Rgb::new(184, 115, 51), 0.22),
        }
    }

    pub fn palette(&self) -> MouldingPalette {
        match self {
            Metal::Gold => MouldingPalette {
                dark: hex(0x3d3008),
                mid_dark: hex(0x5c4a0a),
                mid: hex(0xa67c0a),
                mid_light: hex(0xd4a817),
                light: hex(0xf0d84a),
                highlight: hex(0xfffce0),
                edge: hex(0xfffef5),
            },
            Metal::Silver => MouldingPalette {
                dark: hex(0x1a1a1a),
                mid_dark: hex(0x404040),
                mid: hex(0x808080),
                mid_light: hex(0xc0c0c0),
                light: hex(0xe8e8e8),
                highlight: hex(0xffffff),
                edge: hex(0xfafafa),
            },
            Metal::Copper => MouldingPalette {
                dark: hex(0x2d1804),
                mid_dark: hex(0x5c2e0a),
                mid: hex(0x8b4513),
                mid_light: hex(0xc48450),
                light: hex(0xe8b878),
                highlight: hex(0xfdf5eb),
                edge: hex(0xfdf0e0),
            },
        }
    }
}

/// Polished metal moulding
pub struct MetallicStyle {
    metal: Metal,
}

impl MetallicStyle {
    pub fn new(metal: Metal) -> Self {
        Self { metal }
    }

    /// Two diagonal glints across the moulding
    fn speculars(&self, outer: RectF) -> Vec<Shape> {
        let glint = |center: f32, peak: f32| {
            let spread = 0.12;
            Brush::Linear {
                start: Point::new(outer.x, outer.y),
                end: Point::new(outer.right(), outer.bottom()),
                stops: vec![
                    Stop::new((center - spread).max(0.0), Rgba::TRANSPARENT),
                    Stop::new(center, Rgb::WHITE.with_opacity(peak)),
                    Stop::new((center + spread).min(1.0), Rgba::TRANSPARENT),
                ],
            }
        };

        vec![
            Shape::fill(Geometry::Rect(outer), glint(0.28, 0.35)),
            Shape::fill(Geometry::Rect(outer), glint(0.72, 0.20)),
        ]
    }
}

impl Style for MetallicStyle {
    fn name(&self) -> &str {
        match self.metal {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
            Metal::Copper => "copper",
        }
    }

    fn description(&self) -> &str {
        match self.metal {
            Metal::Gold => "Polished gold frame with warm wash and wall shadow",
            Metal::Silver => "Brushed silver frame with cool wash and wall shadow",
            Metal::Copper => "Burnished copper frame with amber wash and wall shadow",
        }
    }

    fn apply(&self, image: ImageBuffer, _params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
        let palette = self.metal.palette();
        let (tint, opacity) = self.metal.tint();
        debug!("Applying {} frame", self.name());

        let washed = wash(image, tint, opacity)?;
        let framed = extend(washed, Insets::uniform(FRAME_WIDTH), palette.dark.opaque())?;

        let (width, height) = framed.dimensions();
        let outer = RectF::canvas(width, height);
        let depth = FRAME_WIDTH as f32;
        let inner = outer.inset(depth);

        let panels = VectorOverlay::from_shapes(ring::mitered_panels(outer, depth, |side| {
            ring::panel_gradient(side, outer, depth, palette.side_stops(side))
        }));
        let glints = VectorOverlay::from_shapes(self.speculars(outer)).clipped(Geometry::rect_ring(outer, inner));

        let mut details = ring::miter_seams(outer, depth, palette.dark.with_opacity(0.6), 1.0);
        details.push(Shape::stroke(
            Geometry::Rect(outer.inset(0.5)),
            Brush::Solid(palette.dark.opaque()),
            1.0,
        ));
        details.extend(ring::inner_bevel(inner, BEVEL_SHADOW, BEVEL_HIGHLIGHT));

        let framed = composite(
            framed,
            [
                Layer::vector(panels),
                Layer::vector(glints),
                Layer::vector(VectorOverlay::from_shapes(details)),
            ],
        )?;

        ring::mount(
            framed,
            &DropShadow {
                margin: WALL_MARGIN,
                offset_x: 2.0,
                offset_y: 7.0,
                sigma: 9.0,
                opacity: 0.45,
                surface: Rgb::new(238, 236, 232),
            },
        )
    }

    fn supplies_own_tint(&self) -> bool {
        true
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.35,
            procedural: false,
            growth: CanvasGrowth::Uniform(FRAME_WIDTH + WALL_MARGIN),
        }
    }
}
