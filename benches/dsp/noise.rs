//! Benchmarks for colored noise generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drumgrid::dsp::{noise, NoiseColor};
use rand::{rngs::StdRng, SeedableRng};

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    let mut rng = StdRng::seed_from_u64(7);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, color) in [
            ("white", NoiseColor::White),
            ("pink", NoiseColor::Pink),
            ("brown", NoiseColor::Brown),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| noise::fill_with(&mut rng, black_box(&mut buffer), color))
            });
        }
    }

    group.finish();
}
