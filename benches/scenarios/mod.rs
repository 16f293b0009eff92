//! Benchmarks for complete hits and sequencer playback.

mod hits;

pub use hits::{bench_bar, bench_hits};
