/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 44100.0)
/// - frequency: Pitch to render (Hz)
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
}

impl RenderCtx {
    pub fn from_freq(sample_rate: f32, frequency: f32) -> Self {
        Self {
            sample_rate,
            frequency,
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes render audio into a block and respond to hit starts.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a hit starts
    ///
    /// Default implementation does nothing (stateless nodes).
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Check if this node is still producing sound
    fn is_active(&self) -> bool {
        true
    }
}

/// Trigger `node` and render `frames` samples into a fresh buffer, in
/// `MAX_BLOCK_SIZE` blocks. Rendering stops once the node goes quiet; the
/// rest of the buffer stays silent.
pub fn render_hit<N: GraphNode + ?Sized>(node: &mut N, frames: usize, ctx: &RenderCtx) -> Vec<f32> {
    let mut out = vec![0.0f32; frames];
    node.note_on(ctx);
    for block in out.chunks_mut(crate::MAX_BLOCK_SIZE) {
        if !node.is_active() {
            break;
        }
        node.render_block(block, ctx);
    }
    out
}
