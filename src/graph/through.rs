//! Serial chaining: source → effect.

use crate::graph::node::{GraphNode, RenderCtx};

/// Render `source` into the buffer, then let `effect` process it in place.
///
/// Order matters. Every drum voice is source → filter → amplifier, the
/// classic subtractive chain: the filter sees the full-level signal and the
/// envelope shapes what is left.
pub struct Through<S, F> {
    pub source: S,
    pub effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.effect.note_on(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, filter::FilterNode, oscillator::OscNode};

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(48_000.0, 440.0)
    }

    #[test]
    fn renders_source_then_effect() {
        let mut dry = OscNode::square().with_frequency(5_000.0);
        let mut wet = OscNode::square()
            .with_frequency(5_000.0)
            .through(FilterNode::lowpass(200.0));

        let mut dry_buf = vec![0.0; 512];
        let mut wet_buf = vec![0.0; 512];
        dry.render_block(&mut dry_buf, &ctx());
        wet.render_block(&mut wet_buf, &ctx());

        let peak = |b: &[f32]| b.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak(&wet_buf) < peak(&dry_buf) * 0.5);
        assert!(wet_buf.iter().all(|&sample| sample.is_finite()));
    }
}
