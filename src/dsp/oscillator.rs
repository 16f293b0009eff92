use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase-Accumulator Oscillator
============================

Every tonal drum voice starts from one periodic waveform. The oscillator keeps
a phase in [0, 1) and advances it by `frequency / sample_rate` per sample:

    phase += f / sr
    if phase >= 1.0 { phase -= 1.0 }

The waveform is a pure function of phase:

    Sine       sin(2π·phase)
    Square     +1 for the first half of the cycle, -1 for the second
    Sawtooth   2·phase - 1          (ramps up, snaps down)
    Triangle   1 - 4·|phase - 0.5|  (ramps up and down)

These are the "naive" shapes: no band-limiting, so square and sawtooth alias
at high pitches. For percussive hits that are filtered and decay within a
few hundred milliseconds that grit is part of the character.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    #[inline]
    pub fn sample_at(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
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

    /// Restart the cycle so every hit begins at the same point.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn render(&mut self, destination: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;

        for sample in destination.iter_mut() {
            *sample = self.waveform.sample_at(self.phase);
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_matches_reference() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 64];
        osc.render(&mut buffer, &ctx);

        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / 48_000.0).sin();
        assert!((buffer[n] - expected).abs() < 1e-4);
    }

    #[test]
    fn shapes_stay_bipolar() {
        let ctx = RenderCtx::from_freq(48_000.0, 997.0);
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let mut osc = OscillatorBlock::new(waveform);
            let mut buffer = vec![0.0f32; 1024];
            osc.render(&mut buffer, &ctx);
            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{waveform:?} left [-1, 1]"
            );
        }
    }

    #[test]
    fn square_flips_at_half_cycle() {
        assert_eq!(Waveform::Square.sample_at(0.25), 1.0);
        assert_eq!(Waveform::Square.sample_at(0.75), -1.0);
        assert_eq!(Waveform::Triangle.sample_at(0.5), 1.0);
        assert_eq!(Waveform::Sawtooth.sample_at(0.0), -1.0);
    }

    #[test]
    fn reset_restarts_cycle() {
        let ctx = RenderCtx::from_freq(48_000.0, 100.0);
        let mut osc = OscillatorBlock::triangle();
        let mut first = vec![0.0f32; 32];
        osc.render(&mut first, &ctx);

        osc.reset();
        let mut second = vec![0.0f32; 32];
        osc.render(&mut second, &ctx);
        assert_eq!(first, second);
    }
}
