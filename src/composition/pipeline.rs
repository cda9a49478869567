//! The compositing pipeline as an ordered list of stages.
//!
//! Planning resolves everything that depends on the inputs (overlay size,
//! position and mask, ring geometry, whether the tint is redundant), then
//! the stages are folded over the base buffer. Each stage owns the buffer
//! it receives and hands a fresh one to the next.

use tracing::{debug, info};

use crate::{
    color::Rgb,
    compositor::{composite, wash, wash_region, BlendMode, Brush, Geometry, ImageBuffer, Layer, Shape, VectorOverlay},
    error::{CompositingError, Result},
    geometry::{clamp_placement, overlay_size, percent_to_px, Circle, Point, RectF},
    request::{Mood, OverlayRequest, Tint, ValidatedRequest},
    styles::{FrameParams, FrameStyle, Style, StyleContext, StyleRegistry},
};

/// Vintage mood wash
pub const VINTAGE_WASH: Rgb = Rgb::new(112, 66, 20);
pub const VINTAGE_OPACITY: f32 = 0.06;

/// White wash over the overlay box for the illustrated moods
pub const ILLUSTRATED_OPACITY: f32 = 0.08;

/// Overlay resized, masked and positioned on the base
pub struct PlacedOverlay {
    pub image: ImageBuffer,
    pub left: u32,
    pub top: u32,
}

impl PlacedOverlay {
    pub fn bounds(&self) -> RectF {
        RectF::new(
            self.left as f32,
            self.top as f32,
            self.image.width() as f32,
            self.image.height() as f32,
        )
    }
}

/// One step of the pipeline
pub enum Stage {
    Overlay(PlacedOverlay),
    Ring { circle: Circle, stroke: f32, color: Rgb },
    Mood { mood: Mood, overlay_box: Option<RectF> },
    Tint(Tint),
    Frame { style: FrameStyle, params: FrameParams },
}

impl Stage {
    fn label(&self) -> &'static str {
        match self {
            Stage::Overlay(_) => "overlay",
            Stage::Ring { .. } => "ring",
            Stage::Mood { .. } => "mood",
            Stage::Tint(_) => "tint",
            Stage::Frame { .. } => "frame",
        }
    }

    fn apply(self, image: ImageBuffer, registry: &StyleRegistry, ctx: &mut StyleContext) -> Result<ImageBuffer> {
        match self {
            Stage::Overlay(placed) => {
                let (left, top) = (placed.left as i32, placed.top as i32);
                composite(image, [Layer::raster(placed.image).at(left, top)])
            }
            Stage::Ring { circle, stroke, color } => {
                let ring = VectorOverlay::new().with_shape(Shape::stroke(
                    Geometry::Circle(circle),
                    Brush::Solid(color.opaque()),
                    stroke,
                ));
                composite(image, [Layer::vector(ring)])
            }
            Stage::Mood { mood, overlay_box } => match (mood, overlay_box) {
                (Mood::Vintage, _) => wash(image, VINTAGE_WASH, VINTAGE_OPACITY),
                (Mood::Artistic | Mood::Graffiti, Some(rect)) => {
                    wash_region(image, rect, Rgb::WHITE, ILLUSTRATED_OPACITY)
                }
                _ => Ok(image),
            },
            Stage::Tint(tint) => wash(image, tint.color, tint.opacity),
            Stage::Frame { style, params } => apply_frame(registry.get(style), image, &params, ctx),
        }
    }
}

/// Apply a frame style and hold it to the canvas growth it declares
fn apply_frame(style: &dyn Style, image: ImageBuffer, params: &FrameParams, ctx: &mut StyleContext) -> Result<ImageBuffer> {
    let metadata = style.metadata();
    let (width, height) = image.dimensions();
    debug!(
        "Applying {} frame (impact {:.2}, procedural: {})",
        style.name(),
        metadata.performance_impact,
        metadata.procedural
    );

    let framed = style.apply(image, params, ctx)?;
    match metadata.growth.output_size(width, height) {
        Some((w, h)) if framed.dimensions() != (w, h) => Err(CompositingError::StyleFailed {
            style: style.name().to_string(),
            reason: format!(
                "produced {}x{} from {}x{}, expected {}x{}",
                framed.width(),
                framed.height(),
                width,
                height,
                w,
                h
            ),
        }
        .into()),
        _ => Ok(framed),
    }
}

/// Ring stroke width for an overlay `width` pixels wide
pub fn ring_stroke(width: u32) -> f32 {
    (width as f32 / 32.0).round().clamp(2.0, 8.0)
}

/// Resize, mask and position the overlay on a `base_w x base_h` base
pub fn place_overlay(overlay: ImageBuffer, request: &OverlayRequest, base_w: u32, base_h: u32) -> Result<PlacedOverlay> {
    let placement = request.placement;
    let (src_w, src_h) = overlay.dimensions();
    let (w, h) = overlay_size(placement.scale_pct, src_w, src_h, request.circular, base_w, base_h);

    let image = if request.circular {
        let square = overlay.cover_fit(w, h)?;
        let mask = VectorOverlay::new().with_shape(Shape::fill(
            Geometry::Circle(Circle::inscribed(RectF::canvas(w, h))),
            Brush::Solid(Rgb::WHITE.opaque()),
        ));
        composite(square, [Layer::vector(mask).blend(BlendMode::DestinationIn)])?
    } else {
        overlay.resize(w, h)?
    };

    let (left, top) = clamp_placement(
        percent_to_px(placement.x_pct, base_w),
        percent_to_px(placement.y_pct, base_h),
        w,
        h,
        base_w,
        base_h,
    );
    debug!("Overlay placed at ({}, {}) as {}x{}", left, top, w, h);

    Ok(PlacedOverlay { image, left, top })
}

/// Resolve a validated request into its ordered stages
pub fn plan(
    request: &ValidatedRequest,
    base: &ImageBuffer,
    overlay: Option<ImageBuffer>,
    registry: &StyleRegistry,
) -> Result<Vec<Stage>> {
    let mut stages = Vec::new();
    let mut overlay_box = None;

    if let (Some(wanted), Some(image)) = (&request.overlay, overlay) {
        let placed = place_overlay(image, wanted, base.width(), base.height())?;
        let bounds = placed.bounds();
        overlay_box = Some(bounds);
        stages.push(Stage::Overlay(placed));

        if let (true, Some(color)) = (wanted.circular, wanted.ring) {
            let stroke = ring_stroke(bounds.width as u32);
            let center = bounds.center();
            let circle = Circle {
                center: Point::new(center.x, center.y),
                radius: bounds.width / 2.0 + stroke / 2.0,
            };
            stages.push(Stage::Ring { circle, stroke, color });
        }
    }

    if request.mood != Mood::None {
        stages.push(Stage::Mood { mood: request.mood, overlay_box });
    }

    let frame_tints = request
        .frame
        .map(|frame| registry.get(frame.style).supplies_own_tint())
        .unwrap_or(false);

    match request.tint {
        Some(_) if frame_tints => debug!("Skipping tint, frame supplies its own"),
        Some(tint) => stages.push(Stage::Tint(tint)),
        None => {}
    }

    if let Some(frame) = request.frame {
        let strategy = registry.get(frame.style);
        let params = FrameParams::new(frame.color.unwrap_or_else(|| strategy.default_color()))
            .with_vignette_intensity(frame.vignette_intensity);
        stages.push(Stage::Frame { style: frame.style, params });
    }

    Ok(stages)
}

/// Run the full pipeline on decoded inputs
pub fn render(
    request: &ValidatedRequest,
    base: ImageBuffer,
    overlay: Option<ImageBuffer>,
    registry: &StyleRegistry,
    ctx: &mut StyleContext,
) -> Result<ImageBuffer> {
    let stages = plan(request, &base, overlay, registry)?;
    info!(
        "Rendering {} stage(s) on {}x{} base",
        stages.len(),
        base.width(),
        base.height()
    );

    stages.into_iter().try_fold(base, |image, stage| {
        debug!("Stage {}", stage.label());
        stage.apply(image, registry, ctx)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::CompositorError,
        request::{FrameRequest, Placement},
        styles::{CanvasGrowth, StyleMetadata},
    };
    use rand::{rngs::SmallRng, SeedableRng};
    use url::Url;

    fn base_request() -> ValidatedRequest {
        ValidatedRequest {
            base: Url::parse("https://cdn.test/base.png").unwrap(),
            overlay: None,
            tint: None,
            frame: None,
            mood: Mood::None,
        }
    }

    fn overlay_request(x: f32, y: f32, scale: f32, circular: bool, ring: Option<Rgb>) -> OverlayRequest {
        OverlayRequest {
            url: Url::parse("https://cdn.test/logo.png").unwrap(),
            placement: Placement { x_pct: x, y_pct: y, scale_pct: scale },
            circular,
            ring,
        }
    }

    fn solid(w: u32, h: u32, c: Rgb) -> ImageBuffer {
        ImageBuffer::filled(w, h, c.opaque()).unwrap()
    }

    fn ctx() -> StyleContext {
        StyleContext::new(SmallRng::seed_from_u64(11))
    }

    #[test]
    fn test_ring_stroke_bounds() {
        assert_eq!(ring_stroke(10), 2.0);
        assert_eq!(ring_stroke(160), 5.0);
        assert_eq!(ring_stroke(1000), 8.0);
    }

    #[test]
    fn test_circular_overlay_clamped_inside_base() {
        let placed = place_overlay(
            solid(100, 50, Rgb::new(255, 0, 0)),
            &overlay_request(80.0, 80.0, 30.0, true, None),
            1000,
            1000,
        )
        .unwrap();

        assert_eq!((placed.left, placed.top), (700, 700));
        assert_eq!(placed.image.dimensions(), (300, 300));
        assert_eq!(placed.image.pixel(0, 0).unwrap().a, 0);
        assert_eq!(placed.image.pixel(150, 150), Some(Rgb::new(255, 0, 0).opaque()));
    }

    #[test]
    fn test_rectangular_overlay_keeps_aspect() {
        let placed = place_overlay(
            solid(200, 100, Rgb::WHITE),
            &overlay_request(10.0, 20.0, 50.0, false, None),
            400,
            300,
        )
        .unwrap();
        assert_eq!(placed.image.dimensions(), (200, 100));
        assert_eq!((placed.left, placed.top), (40, 60));
    }

    #[test]
    fn test_plan_order_and_tint_skip() {
        let registry = StyleRegistry::new();
        let base = solid(50, 50, Rgb::BLACK);
        let mut request = base_request();
        request.overlay = Some(overlay_request(0.0, 0.0, 20.0, true, Some(Rgb::WHITE)));
        request.mood = Mood::Vintage;
        request.tint = Some(Tint { color: Rgb::new(255, 0, 0), opacity: 0.3 });
        request.frame = Some(FrameRequest { style: FrameStyle::Thin, color: None, vignette_intensity: None });

        let stages = plan(&request, &base, Some(solid(10, 10, Rgb::WHITE)), &registry).unwrap();
        let labels: Vec<_> = stages.iter().map(Stage::label).collect();
        assert_eq!(labels, ["overlay", "ring", "mood", "tint", "frame"]);

        request.frame = Some(FrameRequest { style: FrameStyle::Gold, color: None, vignette_intensity: None });
        let stages = plan(&request, &base, Some(solid(10, 10, Rgb::WHITE)), &registry).unwrap();
        let labels: Vec<_> = stages.iter().map(Stage::label).collect();
        assert_eq!(labels, ["overlay", "ring", "mood", "frame"]);
    }

    #[test]
    fn test_frame_color_defaults_per_style() {
        let registry = StyleRegistry::new();
        let mut request = base_request();
        request.frame = Some(FrameRequest { style: FrameStyle::Neon, color: None, vignette_intensity: None });

        let stages = plan(&request, &solid(4, 4, Rgb::BLACK), None, &registry).unwrap();
        match &stages[0] {
            Stage::Frame { params, .. } => assert_eq!(params.color, Rgb::new(0xFF, 0x2B, 0xD6)),
            _ => panic!("expected frame stage"),
        }
    }

    #[test]
    fn test_ring_drawn_around_overlay() {
        let registry = StyleRegistry::new();
        let mut request = base_request();
        request.overlay = Some(overlay_request(25.0, 25.0, 50.0, true, Some(Rgb::new(0, 0, 255))));

        let out = render(&request, solid(128, 128, Rgb::WHITE), Some(solid(64, 64, Rgb::new(255, 0, 0))), &registry, &mut ctx())
            .unwrap();

        // overlay box is 64px at (32, 32); stroke 2 centred 1px outside the disc
        assert_eq!(out.pixel(64, 64), Some(Rgb::new(255, 0, 0).opaque()));
        let ring = out.pixel(64, 31).unwrap();
        assert!(ring.b > 200 && ring.r < 60, "ring pixel {ring:?}");
        assert_eq!(out.pixel(2, 2), Some(Rgb::WHITE.opaque()));
    }

    #[test]
    fn test_illustrated_mood_only_touches_overlay_box() {
        let registry = StyleRegistry::new();
        let mut request = base_request();
        request.overlay = Some(overlay_request(0.0, 0.0, 50.0, false, None));
        request.mood = Mood::Graffiti;

        let out = render(&request, solid(40, 40, Rgb::BLACK), Some(solid(10, 10, Rgb::BLACK)), &registry, &mut ctx())
            .unwrap();
        assert!(out.pixel(5, 5).unwrap().r > 0);
        assert_eq!(out.pixel(30, 30), Some(Rgb::BLACK.opaque()));
    }

    #[test]
    fn test_illustrated_mood_without_overlay_is_noop() {
        let registry = StyleRegistry::new();
        for mood in [Mood::Artistic, Mood::Graffiti] {
            let mut request = base_request();
            request.mood = mood;

            let base = solid(24, 16, Rgb::new(40, 90, 140));
            let out = render(&request, base.clone(), None, &registry, &mut ctx()).unwrap();
            assert_eq!(out.pixmap().data(), base.pixmap().data(), "{mood:?}");
        }
    }

    struct Misreported;

    impl Style for Misreported {
        fn name(&self) -> &str {
            "misreported"
        }

        fn description(&self) -> &str {
            "Declares padding it never adds"
        }

        fn apply(&self, image: ImageBuffer, _params: &FrameParams, _ctx: &mut StyleContext) -> Result<ImageBuffer> {
            Ok(image)
        }

        fn metadata(&self) -> StyleMetadata {
            StyleMetadata { growth: CanvasGrowth::Uniform(4), ..StyleMetadata::default() }
        }
    }

    #[test]
    fn test_frame_must_grow_as_declared() {
        let params = FrameParams::new(Rgb::BLACK);
        let err = apply_frame(&Misreported, solid(10, 10, Rgb::WHITE), &params, &mut ctx()).unwrap_err();
        assert!(matches!(
            err,
            CompositorError::Compositing(CompositingError::StyleFailed { ref style, .. }) if style == "misreported"
        ));
        assert_eq!(err.user_message(), "Failed to process image");

        let registry = StyleRegistry::new();
        let framed = apply_frame(registry.get(FrameStyle::Thick), solid(10, 10, Rgb::WHITE), &params, &mut ctx()).unwrap();
        assert_eq!(framed.dimensions(), (42, 42));
    }
}
