//! Style render benchmarks on a 512x512 base.
//! Run: cargo bench

use brand_compositor::{
    color::Rgb,
    compositor::ImageBuffer,
    styles::{FrameParams, FrameStyle, StyleContext, StyleRegistry},
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, SeedableRng};

fn bench_heavy_styles(c: &mut Criterion) {
    let registry = StyleRegistry::new();
    let base = ImageBuffer::filled(512, 512, Rgb::new(90, 110, 140).opaque()).expect("allocate base");

    let mut group = c.benchmark_group("frame_style");
    group.sample_size(20);

    for style in [FrameStyle::Neon, FrameStyle::Filmstrip, FrameStyle::Gold] {
        let strategy = registry.get(style);
        let params = FrameParams::new(strategy.default_color());

        group.bench_function(format!("{}_512", style), |b| {
            b.iter(|| {
                let mut ctx = StyleContext::new(SmallRng::seed_from_u64(42));
                black_box(strategy.apply(base.clone(), &params, &mut ctx).expect("render"))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_heavy_styles);
criterion_main!(benches);
