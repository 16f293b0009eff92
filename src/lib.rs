pub mod backend; // Audio output seam (device, recording stub, null)
pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Composable render nodes
pub mod machine; // The instrument facade driven by the host event loop
pub mod sequencing; // Pattern grid, templates, snapshots and the step scheduler
pub mod voices; // Kick, snare and hi-hat synthesis

pub use config::MachineConfig;
pub use machine::{DrumMachine, MachineObserver, MachineView, ObserverId};
pub use voices::Voice;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Steps in one pattern bar (sixteenth notes).
pub const STEPS: usize = 16;

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
pub const DEFAULT_BPM: u32 = 60;
