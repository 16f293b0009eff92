use rand::Rng;
use serde::{Deserialize, Serialize};

/*
Coloured Noise
==============

Noise is the raw material for snares: no pitch, just a spread of energy
across the spectrum. The "colour" describes how that energy is distributed.

  white   Equal power per Hz. Every sample is an independent uniform draw
          in [-1, 1]. Bright and hissy.

  pink    Power falls 3 dB per octave (equal power per octave). Warmer,
          closer to how rain or a brushed drum sounds. Built by running
          white noise through a bank of one-pole lowpass filters with
          staggered poles (Paul Kellet's refined method):

              b0 = 0.99886·b0 + w·0.0555179
              b1 = 0.99332·b1 + w·0.0750759
              b2 = 0.96900·b2 + w·0.1538520
              b3 = 0.86650·b3 + w·0.3104856
              b4 = 0.55000·b4 + w·0.5329522
              b5 = -0.7616·b5 - w·0.0168980
              out = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + w·0.5362) · 0.11
              b6 = w·0.115926

          b6 is written AFTER the output is summed, so each sample sees the
          previous sample's b6 term. Reordering it changes the spectrum.

  brown   Power falls 6 dB per octave. A leaky integrator (random walk that
          drifts back towards zero) gives a deep rumble:

              b0 = (b0 + w·0.02) · 0.996
              out = b0 · 3.5

Filter memory lives on the stack of a single `generate` call: every buffer
starts shaping from silence and nothing carries over between hits.

Only white noise is bounded to [-1, 1]. The pink and brown gains are fixed
by the formulas above, and both regularly swing past ±1. The device mixer
clamps its sum; nothing upstream of it may assume unit range.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

/// Fill a fresh buffer of `length` samples of `color` noise.
///
/// White samples lie in [-1, 1]. Pink and brown are not range-limited.
pub fn generate(length: usize, color: NoiseColor) -> Vec<f32> {
    generate_with(&mut rand::thread_rng(), length, color)
}

/// Same as [`generate`] with a caller-supplied random source.
pub fn generate_with<R: Rng>(rng: &mut R, length: usize, color: NoiseColor) -> Vec<f32> {
    let mut out = vec![0.0f32; length];
    fill_with(rng, &mut out, color);
    out
}

/// Overwrite `out` with noise. Filter state starts at zero.
pub fn fill_with<R: Rng>(rng: &mut R, out: &mut [f32], color: NoiseColor) {
    let (mut b0, mut b1, mut b2, mut b3, mut b4, mut b5, mut b6) =
        (0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32);

    for sample in out.iter_mut() {
        let white: f32 = rng.gen_range(-1.0..=1.0);

        *sample = match color {
            NoiseColor::White => white,
            NoiseColor::Pink => {
                b0 = 0.99886 * b0 + white * 0.0555179;
                b1 = 0.99332 * b1 + white * 0.0750759;
                b2 = 0.96900 * b2 + white * 0.1538520;
                b3 = 0.86650 * b3 + white * 0.3104856;
                b4 = 0.55000 * b4 + white * 0.5329522;
                b5 = -0.7616 * b5 - white * 0.0168980;
                let pink = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362) * 0.11;
                b6 = white * 0.115926;
                pink
            }
            NoiseColor::Brown => {
                b0 = (b0 + white * 0.02) * 0.996;
                b0 * 3.5
            }
        };
    }
}
