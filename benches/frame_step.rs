//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use hyperfield::particles::{find_links, ParticleConfig, ParticleField, Viewport};
use hyperfield::tesseract::{RotationMode, Tesseract, TesseractConfig};

fn bench_particle_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_step");

    for count in [100usize, 400, 1600] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = ParticleConfig::default().with_count(count).with_seed(1);
            let mut field = ParticleField::new(&config, Viewport::new(1920.0, 1080.0));
            b.iter(|| {
                field.step();
                black_box(field.links().len())
            })
        });
    }

    group.finish();
}

fn bench_find_links(c: &mut Criterion) {
    let config = ParticleConfig::default().with_seed(2);
    let field = ParticleField::new(&config, Viewport::new(1920.0, 1080.0));
    c.bench_function("find_links_100", |b| {
        b.iter(|| black_box(find_links(black_box(field.particles()), 100.0)))
    });
}

fn bench_tesseract_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("tesseract_advance");

    for (name, mode) in [("fresh", RotationMode::Fresh), ("cumulative", RotationMode::Cumulative)] {
        group.bench_function(name, |b| {
            let config = TesseractConfig::default().with_mode(mode);
            b.iter_batched(
                || Tesseract::new(&config),
                |mut tesseract| {
                    tesseract.advance();
                    black_box(tesseract.segments().len())
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_particle_step, bench_find_links, bench_tesseract_advance);
criterion_main!(benches);
