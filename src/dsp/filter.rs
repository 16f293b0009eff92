use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
| type      | passes       | rejects      | Q means                     |
| --------- | ------------ | ------------ | --------------------------- |
| low-pass  | below cutoff | above cutoff | peak at cutoff, in dB       |
| high-pass | above cutoff | below cutoff | peak at cutoff, in dB       |
| band-pass | near cutoff  | both sides   | linear width (cutoff / bw)  |

Q follows the browser biquad convention the presets were voiced against:
for the two shelving responses it is the resonant gain at the cutoff in dB,
for band-pass it is the ordinary linear quality factor. Both reduce to the
SVF damping term `k`:

    low/high-pass   k = 10^(-Q/20)
    band-pass       k = 1 / Q

The band-pass output is scaled by `k` so the centre frequency sits at unity.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    LowPass,
    HighPass,
    BandPass,
}

impl FilterKind {
    /// Damping term for a Q given in this response's convention.
    pub fn damping_for_q(self, q: f32) -> f32 {
        match self {
            FilterKind::LowPass | FilterKind::HighPass => 10.0_f32.powf(-q / 20.0),
            FilterKind::BandPass => 1.0 / q.max(1e-3),
        }
    }
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    damping: f32,
    kind: FilterKind,
}

impl SVFilter {
    pub fn new(kind: FilterKind, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            damping: 2.0,
            kind,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterKind::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterKind::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterKind::BandPass, cutoff_hz)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.set_q(q);
        self
    }

    #[inline]
    fn compute_g(&self, ctx: &RenderCtx) -> f32 {
        // tan() blows up at Nyquist
        let cutoff = self.cutoff_hz.clamp(1.0, ctx.sample_rate * 0.49);
        let wd = TAU * cutoff;
        let wa = (2.0 * ctx.sample_rate) * (wd / (2.0 * ctx.sample_rate)).tan();
        wa / (2.0 * ctx.sample_rate)
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx);
        let k = self.damping;

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.kind {
                FilterKind::LowPass => outputs.lowpass,
                FilterKind::HighPass => outputs.highpass,
                FilterKind::BandPass => outputs.bandpass * k,
            }
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.damping = self.kind.damping_for_q(q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(32);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn steady_peak(buffer: &[f32]) -> f32 {
        buffer[buffer.len() * 3 / 4..]
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn sine_through(filter: &mut SVFilter, freq: f32, len: usize) -> Vec<f32> {
        let ctx = RenderCtx::from_freq(48_000.0, freq);
        let mut buffer = vec![0.0f32; len];
        OscillatorBlock::sine().render(&mut buffer, &ctx);
        filter.render(&mut buffer, &ctx);
        buffer
    }

    #[test]
    fn test_lowpass_basic() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 128];
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);

        filter.render(&mut buffer, &ctx);

        assert!(buffer[127] > 0.99);
    }

    #[test]
    fn test_highpass_basic() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 128];
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);

        filter.render(&mut buffer, &ctx);

        assert!(buffer[127] < 0.001);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = SVFilter::lowpass(500.0);
        let buffer = sine_through(&mut filter, 5_000.0, 128);

        // 10x cutoff, 12dB/octave
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak < 0.3, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_bandpass_unity_at_centre() {
        let mut filter = SVFilter::bandpass(1_000.0).with_q(5.0);
        let pass = steady_peak(&sine_through(&mut filter, 1_000.0, 4096));

        filter.reset();
        let off = steady_peak(&sine_through(&mut filter, 200.0, 4096));

        assert!((pass - 1.0).abs() < 0.1, "centre gain was {pass}");
        assert!(
            pass > off * 2.0,
            "expected bandpass to emphasize cutoff freq, got pass={}, off={}",
            pass,
            off
        );
    }

    #[test]
    fn test_q_in_db_raises_lowpass_peak() {
        let mut flat = SVFilter::lowpass(1_000.0).with_q(0.0);
        let flat_peak = steady_peak(&sine_through(&mut flat, 1_000.0, 4096));

        let mut resonant = SVFilter::lowpass(1_000.0).with_q(10.0);
        let resonant_peak = steady_peak(&sine_through(&mut resonant, 1_000.0, 4096));

        // +10 dB is a little over 3x
        let ratio = resonant_peak / flat_peak;
        assert!(ratio > 2.8 && ratio < 3.5, "ratio was {ratio}");
    }

    #[test]
    fn test_damping_conventions() {
        assert!((FilterKind::LowPass.damping_for_q(0.0) - 1.0).abs() < 1e-6);
        assert!((FilterKind::HighPass.damping_for_q(20.0) - 0.1).abs() < 1e-6);
        assert!((FilterKind::BandPass.damping_for_q(5.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_cutoff_above_nyquist_stays_finite() {
        let mut filter = SVFilter::highpass(30_000.0).with_q(10.0);
        let buffer = sine_through(&mut filter, 440.0, 512);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_set_cutoff_affects_filtering() {
        let mut filter = SVFilter::lowpass(200.0);
        let peak_low_cutoff = peak_after_transient(&sine_through(&mut filter, 1_000.0, 256));

        filter.reset();
        filter.set_cutoff(5_000.0);
        let peak_high_cutoff = peak_after_transient(&sine_through(&mut filter, 1_000.0, 256));

        assert!(
            peak_high_cutoff > peak_low_cutoff * 2.0,
            "High cutoff should pass more signal: high={}, low={}",
            peak_high_cutoff,
            peak_low_cutoff
        );
    }
}
