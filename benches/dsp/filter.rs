//! Benchmarks for the state-variable filter at the resonances the voices use.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use drumgrid::dsp::filter::SVFilter;
use drumgrid::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0);

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        let filters = [
            ("lowpass_q10", SVFilter::lowpass(100.0).with_q(10.0)),
            ("highpass_q10", SVFilter::highpass(8_000.0).with_q(10.0)),
            ("bandpass_q5", SVFilter::bandpass(1_000.0).with_q(5.0)),
        ];
        for (name, mut filter) in filters {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
