//! Benchmarks for the wave math functions.
//!
//! Run with: `cargo bench --bench wave_math`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slitwave::config::{Config, Viewport};
use slitwave::wave::{complex_amplitude, double_slit_pattern, probability, theoretical_profile, Source};
use slitwave::DVec2;

fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern");

    group.bench_function("double_slit_pattern", |b| {
        b.iter(|| black_box(double_slit_pattern(black_box(0.05), 60.0, 10.0, 20.0)))
    });

    group.bench_function("double_slit_pattern_center", |b| {
        b.iter(|| black_box(double_slit_pattern(black_box(0.0), 60.0, 10.0, 20.0)))
    });

    group.bench_function("complex_amplitude", |b| {
        let sources = [
            Source { position: DVec2::new(150.0, 170.0), open: true },
            Source { position: DVec2::new(150.0, 230.0), open: true },
        ];
        b.iter(|| {
            let amplitude = complex_amplitude(black_box(DVec2::new(800.0, 213.0)), &sources);
            black_box(probability(amplitude))
        })
    });

    group.finish();
}

fn bench_theoretical_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("theoretical_profile");

    for height in [200u32, 400, 1080] {
        let config = Config {
            viewport: Viewport { width: 800, height },
            ..Config::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(height), &config, |b, config| {
            b.iter(|| black_box(theoretical_profile(config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pattern, bench_theoretical_profile);
criterion_main!(benches);
