use crate::dsp::oscillator::{OscillatorBlock, Waveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

The tonal source for kick and hi-hat. It generates a repeating waveform at a
fixed frequency, and the filter and envelope downstream shape it into a hit.

Waveform Types and Their Character:
-----------------------------------

Sine: a single frequency with no harmonics.
  - Kick: round, deep body ("deep", "boomy")

Triangle: odd harmonics falling off as 1/n².
  - Kick: slightly more knock ("punchy"); hi-hat: soft, dull tick

Square: odd harmonics falling off as 1/n.
  - Hi-hat: hollow metallic buzz once highpassed; kick: "tight" click

Sawtooth: all harmonics falling off as 1/n.
  - Hi-hat: the brightest, sharpest tick

Example usage:
  let hat = OscNode::new(Waveform::Square)
      .with_frequency(4000.0)
      .through(FilterNode::highpass(8000.0).with_q(10.0))
      .amplify(DecayNode::new(0.4, 0.1));
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency and uses this instead.
    base_frequency: Option<f32>,
}

impl OscNode {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            base_frequency: None,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Sawtooth)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    /// Set a fixed frequency, ignoring the pitch from RenderCtx.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frequency = self.base_frequency.unwrap_or(ctx.frequency);
        let ctx = RenderCtx { frequency, ..*ctx };
        self.osc.render(out, &ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn fixed_frequency_overrides_ctx() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);
        let mut fixed = OscNode::sine().with_frequency(60.0);
        let mut buffer = vec![0.0f32; 128];
        fixed.render_block(&mut buffer, &ctx);

        let n = 100;
        let expected = (TAU * 60.0 * n as f32 / 48_000.0).sin();
        assert!((buffer[n] - expected).abs() < 1e-4);
    }

    #[test]
    fn follows_ctx_without_fixed_frequency() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);
        let mut osc = OscNode::sine();
        let mut buffer = vec![0.0f32; 64];
        osc.render_block(&mut buffer, &ctx);

        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / 48_000.0).sin();
        assert!((buffer[n] - expected).abs() < 1e-4);
    }
}
