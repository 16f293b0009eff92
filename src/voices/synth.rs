use crate::{
    backend::AudioBackend,
    dsp::Waveform,
    graph::{
        envelope::DecayNode, extensions::NodeExt, filter::FilterNode, node::render_hit,
        noise::NoiseBufferNode, oscillator::OscNode, RenderCtx,
    },
};

use super::{
    presets::{Source, TimbrePreset},
    Voice, VoiceSettings,
};

/*
Hit Synthesis
=============

Every hit is one of two small graphs, built fresh from a settings snapshot:

Tonal (kick, hi-hat):

    OscNode(waveform @ pitch) → FilterNode(preset kind @ preset cutoff, Q 10) → × DecayNode

  The oscillator runs for exactly `duration` seconds.

Noise (snare):

    NoiseBufferNode(color, duration) → FilterNode(preset kind @ pitch, Q 5) → × DecayNode

  Here the voice pitch moves the filter, not the preset cutoff: there is no
  oscillator to tune, so "pitch" means where the noise is focused. The buffer
  length bounds the hit.

Both envelopes start at the voice volume and fall exponentially to 0.01 at
`duration`.

Fallback:

  When the full graph cannot be used the synthesizer degrades to a fixed sine
  beep per voice (start gain 0.3), ignoring settings and presets:

      kick   100 Hz  400 ms
      snare  200 Hz  200 ms
      hihat  800 Hz  100 ms
*/

const TONE_Q: f32 = 10.0;
const NOISE_Q: f32 = 5.0;
const BEEP_GAIN: f32 = 0.3;

/// A hit rendered offline, ready for an audio backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedHit {
    pub voice: Voice,
    pub samples: Vec<f32>,
    pub sample_rate: f32,
}

impl RenderedHit {
    /// Length in seconds.
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthMode {
    /// Preset graphs driven by the voice settings.
    Full,
    /// One fixed sine beep per voice.
    Fallback,
}

/// Frequency (Hz) and length (seconds) of the fallback beep.
pub fn beep_params(voice: Voice) -> (f32, f32) {
    match voice {
        Voice::Kick => (100.0, 0.4),
        Voice::Snare => (200.0, 0.2),
        Voice::Hihat => (800.0, 0.1),
    }
}

fn frames_for(sample_rate: f32, seconds: f32) -> usize {
    (sample_rate * seconds).max(0.0) as usize
}

/// Stateless renderer: settings and preset go in, samples come out.
#[derive(Debug, Clone, Copy)]
pub struct VoiceSynthesizer {
    sample_rate: f32,
    mode: SynthMode,
}

impl VoiceSynthesizer {
    pub fn new(sample_rate: f32, mode: SynthMode) -> Self {
        Self { sample_rate, mode }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn mode(&self) -> SynthMode {
        self.mode
    }

    pub fn render(&self, voice: Voice, settings: &VoiceSettings, preset: &TimbrePreset) -> RenderedHit {
        let samples = match (self.mode, preset.source) {
            (SynthMode::Fallback, _) => self.beep(voice),
            (SynthMode::Full, Source::Tone(wave)) => self.tone(wave, settings, preset),
            (SynthMode::Full, Source::Noise(color)) => {
                let ctx = RenderCtx::from_freq(self.sample_rate, settings.pitch);
                let source = NoiseBufferNode::generate(color, self.sample_rate, settings.duration);
                let frames = source.len();
                let mut graph = source
                    .through(FilterNode::new(preset.filter, settings.pitch).with_q(NOISE_Q))
                    .amplify(DecayNode::new(settings.volume, settings.duration));
                render_hit(&mut graph, frames, &ctx)
            }
        };

        RenderedHit {
            voice,
            samples,
            sample_rate: self.sample_rate,
        }
    }

    fn tone(&self, wave: Waveform, settings: &VoiceSettings, preset: &TimbrePreset) -> Vec<f32> {
        let ctx = RenderCtx::from_freq(self.sample_rate, settings.pitch);
        let mut graph = OscNode::new(wave)
            .with_frequency(settings.pitch)
            .through(FilterNode::new(preset.filter, preset.cutoff_hz).with_q(TONE_Q))
            .amplify(DecayNode::new(settings.volume, settings.duration));
        render_hit(&mut graph, frames_for(self.sample_rate, settings.duration), &ctx)
    }

    fn beep(&self, voice: Voice) -> Vec<f32> {
        let (frequency, seconds) = beep_params(voice);
        let ctx = RenderCtx::from_freq(self.sample_rate, frequency);
        let mut graph = OscNode::sine().amplify(DecayNode::new(BEEP_GAIN, seconds));
        render_hit(&mut graph, frames_for(self.sample_rate, seconds), &ctx)
    }

    /// Render and hand one hit to `backend`. Returns whether it was queued.
    ///
    /// An unavailable backend makes this a silent no-op, and backend errors
    /// are logged here rather than returned: a failing voice must never stop
    /// the sequencer.
    pub fn trigger(
        &self,
        backend: &mut dyn AudioBackend,
        voice: Voice,
        settings: &VoiceSettings,
        preset: &TimbrePreset,
    ) -> bool {
        if !backend.is_available() {
            tracing::trace!(%voice, "no audio backend, trigger ignored");
            return false;
        }

        let hit = self.render(voice, settings, preset);
        match backend.play(hit) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%voice, "failed to play hit: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{NullBackend, RecordingBackend},
        voices::presets,
    };

    const SR: f32 = 44_100.0;

    fn render_default(voice: Voice, mode: SynthMode) -> RenderedHit {
        let settings = VoiceSettings::default_for(voice);
        let preset = presets::preset(voice, &settings.timbre).unwrap();
        VoiceSynthesizer::new(SR, mode).render(voice, &settings, preset)
    }

    #[test]
    fn hit_length_follows_duration() {
        assert_eq!(render_default(Voice::Kick, SynthMode::Full).samples.len(), 17_640);
        assert_eq!(render_default(Voice::Snare, SynthMode::Full).samples.len(), 8_820);
        assert_eq!(render_default(Voice::Hihat, SynthMode::Full).samples.len(), 4_410);
    }

    #[test]
    fn envelope_bounds_every_sample() {
        for voice in Voice::ALL {
            let settings = VoiceSettings::default_for(voice);
            for preset in presets::presets(voice) {
                let hit = VoiceSynthesizer::new(SR, SynthMode::Full).render(voice, &settings, preset);
                assert!(hit.samples.iter().all(|s| s.is_finite()), "{voice}/{}", preset.name);
                assert!(hit.peak() > 0.0, "{voice}/{} is silent", preset.name);
            }
        }
    }

    #[test]
    fn tail_is_quieter_than_head() {
        let hit = render_default(Voice::Kick, SynthMode::Full);
        let quarter = hit.samples.len() / 4;
        let head = hit.samples[..quarter].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail = hit.samples[3 * quarter..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail < head * 0.5, "head {head}, tail {tail}");
    }

    #[test]
    fn zero_volume_is_silent() {
        let mut settings = VoiceSettings::default_for(Voice::Snare);
        settings.volume = 0.0;
        let preset = presets::default_preset(Voice::Snare);
        let hit = VoiceSynthesizer::new(SR, SynthMode::Full).render(Voice::Snare, &settings, preset);
        assert_eq!(hit.peak(), 0.0);
    }

    #[test]
    fn fallback_ignores_settings() {
        let mut settings = VoiceSettings::default_for(Voice::Kick);
        settings.duration = 1.5;
        let preset = presets::default_preset(Voice::Kick);
        let hit = VoiceSynthesizer::new(SR, SynthMode::Fallback).render(Voice::Kick, &settings, preset);

        assert_eq!(hit.samples.len(), 17_640);
        assert!(hit.peak() <= BEEP_GAIN + 1e-6);
    }

    #[test]
    fn trigger_queues_on_backend() {
        let (mut backend, log) = RecordingBackend::new(SR);
        let settings = VoiceSettings::default_for(Voice::Hihat);
        let preset = presets::default_preset(Voice::Hihat);

        let synth = VoiceSynthesizer::new(SR, SynthMode::Full);
        assert!(synth.trigger(&mut backend, Voice::Hihat, &settings, preset));
        assert_eq!(log.voices(), vec![Voice::Hihat]);
    }

    #[test]
    fn trigger_without_backend_is_noop() {
        let mut backend = NullBackend::new(SR);
        let settings = VoiceSettings::default_for(Voice::Kick);
        let preset = presets::default_preset(Voice::Kick);

        let synth = VoiceSynthesizer::new(SR, SynthMode::Full);
        assert!(!synth.trigger(&mut backend, Voice::Kick, &settings, preset));
    }

    #[test]
    fn failing_backend_is_contained() {
        let (mut backend, log) = RecordingBackend::failing(SR);
        let settings = VoiceSettings::default_for(Voice::Snare);
        let preset = presets::default_preset(Voice::Snare);

        let synth = VoiceSynthesizer::new(SR, SynthMode::Full);
        assert!(!synth.trigger(&mut backend, Voice::Snare, &settings, preset));
        assert!(log.is_empty());
    }
}
