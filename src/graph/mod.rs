//! Composable building blocks for rendering drum hits.
//!
//! Graph nodes wrap the low-level DSP primitives with hit events and
//! block-based rendering. The `extensions` module adds fluent helpers so a
//! voice reads as its signal chain: `source.through(filter).amplify(env)`.

/// Multiply two signals together (envelope → VCA).
pub mod amplify;
/// Exponential decay envelope node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`).
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// One-shot noise buffer playback.
pub mod noise;
/// Audio-band oscillators.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{render_hit, GraphNode, RenderCtx};
