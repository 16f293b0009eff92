use crate::{
    dsp::noise::{self, NoiseColor},
    graph::node::{GraphNode, RenderCtx},
};

/// Plays a pre-generated noise buffer once, then silence.
///
/// The buffer length bounds the hit: no explicit stop is needed.
pub struct NoiseBufferNode {
    buffer: Vec<f32>,
    position: usize,
}

impl NoiseBufferNode {
    pub fn new(buffer: Vec<f32>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// `duration` seconds of `color` noise at `sample_rate`.
    pub fn generate(color: NoiseColor, sample_rate: f32, duration: f32) -> Self {
        let length = (sample_rate * duration).max(0.0) as usize;
        Self::new(noise::generate(length, color))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl GraphNode for NoiseBufferNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let available = self.buffer.len().saturating_sub(self.position);
        let n = available.min(out.len());

        out[..n].copy_from_slice(&self.buffer[self.position..self.position + n]);
        out[n..].fill(0.0);
        self.position += n;
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.position = 0;
    }

    fn is_active(&self) -> bool {
        self.position < self.buffer.len()
    }
}
