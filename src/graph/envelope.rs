use crate::{
    dsp::envelope::DecayEnvelope,
    graph::node::{GraphNode, RenderCtx},
};

/// Gain curve for one hit: starts at the voice volume, decays to 0.01.
///
/// Use as the modulator of `.amplify()`.
pub struct DecayNode {
    env: DecayEnvelope,
}

impl DecayNode {
    pub fn new(volume: f32, duration: f32) -> Self {
        Self {
            env: DecayEnvelope::new(volume, duration),
        }
    }
}

impl GraphNode for DecayNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.env.render(out);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
