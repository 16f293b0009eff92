//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components keep to the signal-processing math: oscillator phase,
//! filter memory, envelope level and noise shaping. Graph nodes layer note
//! events and chaining on top.

/// Exponential decay envelope for percussive hits.
pub mod envelope;
/// State-variable filter with browser-style Q.
pub mod filter;
/// White, pink and brown noise buffers.
pub mod noise;
/// Periodic waveforms.
pub mod oscillator;

pub use envelope::DecayEnvelope;
pub use filter::FilterKind;
pub use noise::NoiseColor;
pub use oscillator::Waveform;
