//! Benchmarks for the exponential decay envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drumgrid::dsp::DecayEnvelope;
use drumgrid::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_freq(48_000.0, 0.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut env = DecayEnvelope::new(0.8, 0.4);

        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                env.note_on(&ctx);
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
