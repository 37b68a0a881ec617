//! Benchmarks for the per-frame session update and software rendering.
//!
//! Run with: `cargo bench --bench session_tick`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slitwave::config::DetectionMode;
use slitwave::{Config, FrameBuffer, Renderer, Session};

/// A session that has run long enough to have a full flight of particles.
fn warmed(config: &Config) -> Session {
    let mut session = Session::seeded(config, 7);
    for _ in 0..600 {
        session.tick(config, 1.0 / 60.0);
    }
    session
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for mode in [DetectionMode::Particle, DetectionMode::Wave, DetectionMode::Accumulation] {
        let config = Config {
            emission_rate: 100.0,
            detection_mode: mode,
            ..Config::default()
        };
        let mut session = warmed(&config);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", mode)), &config, |b, config| {
            b.iter(|| black_box(session.tick(config, 1.0 / 60.0)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for (name, mode, show_paths) in [
        ("accumulation", DetectionMode::Accumulation, false),
        ("wave", DetectionMode::Wave, false),
        ("paths", DetectionMode::Particle, true),
    ] {
        let config = Config {
            emission_rate: 100.0,
            detection_mode: mode,
            show_paths,
            ..Config::default()
        };
        let session = warmed(&config);
        let renderer = Renderer::new();
        let mut frame = FrameBuffer::new(config.viewport.width, config.viewport.height);
        group.bench_function(name, |b| {
            b.iter(|| {
                renderer.draw(&session.snapshot(), &config, &mut frame);
                black_box(frame.as_bytes().len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_render);
criterion_main!(benches);
