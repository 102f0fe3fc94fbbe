//! Per-tick cost of the adaptive quality loop.
//!
//! Every tick refits the ridge model over the whole window, so cost grows
//! with window capacity. These groups track that growth.

use arena_core::{AdaptiveQualityManager, GraphicsConfig, QualitySettings, RidgeRegressor, TelemetrySample};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

fn generate_samples(n: usize, seed: u64) -> Vec<TelemetrySample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let frame_time = rng.gen_range(12.0..22.0);
            TelemetrySample {
                fps: 1000.0 / frame_time,
                gpu_temp: rng.gen_range(55.0..80.0),
                cpu_usage: rng.gen_range(20.0..90.0),
                frame_time_ms: frame_time,
            }
        })
        .collect()
}

/// One `update` call against a full window.
fn bench_update_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("quality_update_tick");
    group.measurement_time(Duration::from_secs(5));

    for capacity in [30usize, 120, 480].iter() {
        let settings = QualitySettings {
            window_capacity: *capacity,
            ..QualitySettings::default()
        };
        let samples = generate_samples(capacity * 2, 17);
        let config = GraphicsConfig::default();

        let mut manager = AdaptiveQualityManager::new(&settings).unwrap();
        for sample in &samples[..*capacity] {
            let _ = manager.update(sample, &config);
        }

        let mut i = 0;
        group.bench_with_input(BenchmarkId::new("update", capacity), &samples, |b, samples| {
            b.iter(|| {
                i = (i + 1) % samples.len();
                black_box(manager.update(black_box(&samples[i]), &config))
            });
        });
    }

    group.finish();
}

/// Raw fit cost without the window bookkeeping.
fn bench_ridge_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ridge_fit");

    for rows in [30usize, 120, 480].iter() {
        let samples = generate_samples(*rows, 5);
        let features: Vec<[f64; 4]> = samples.iter().map(|s| s.features()).collect();
        let targets: Vec<f64> = samples.iter().map(|s| s.performance_margin(16.0)).collect();

        group.bench_with_input(BenchmarkId::new("fit", rows), &features, |b, features| {
            let mut model = RidgeRegressor::new(1e-2);
            b.iter(|| model.fit(black_box(features), black_box(&targets)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update_tick, bench_ridge_fit);
criterion_main!(benches);
