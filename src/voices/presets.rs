//! Timbre preset tables.
//!
//! Each voice has four named timbres. A preset fixes the raw source (a
//! waveform for the tonal voices, a noise color for the snare) and the filter
//! response; pitch, volume and duration stay user-tunable in
//! [`VoiceSettings`](super::VoiceSettings).

use crate::dsp::{FilterKind, NoiseColor, Waveform};

use super::Voice;

/// Raw sound source before the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Oscillator at the voice pitch.
    Tone(Waveform),
    /// Noise buffer as long as the hit. The voice pitch becomes the filter
    /// cutoff instead of `cutoff_hz`.
    Noise(NoiseColor),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimbrePreset {
    pub name: &'static str,
    pub source: Source,
    pub filter: FilterKind,
    pub cutoff_hz: f32,
}

impl TimbrePreset {
    const fn tone(name: &'static str, wave: Waveform, filter: FilterKind, cutoff_hz: f32) -> Self {
        Self {
            name,
            source: Source::Tone(wave),
            filter,
            cutoff_hz,
        }
    }

    const fn noise(name: &'static str, color: NoiseColor, filter: FilterKind, cutoff_hz: f32) -> Self {
        Self {
            name,
            source: Source::Noise(color),
            filter,
            cutoff_hz,
        }
    }
}

use FilterKind::{BandPass, HighPass, LowPass};

const HIHAT: [TimbrePreset; 4] = [
    TimbrePreset::tone("metallic", Waveform::Square, HighPass, 8000.0),
    TimbrePreset::tone("sharp", Waveform::Sawtooth, BandPass, 6000.0),
    TimbrePreset::tone("soft", Waveform::Triangle, LowPass, 4000.0),
    TimbrePreset::tone("vintage", Waveform::Square, BandPass, 3000.0),
];

const SNARE: [TimbrePreset; 4] = [
    TimbrePreset::noise("classic", NoiseColor::White, BandPass, 1000.0),
    TimbrePreset::noise("punchy", NoiseColor::Pink, HighPass, 800.0),
    TimbrePreset::noise("fat", NoiseColor::Brown, LowPass, 1200.0),
    TimbrePreset::noise("electronic", NoiseColor::White, BandPass, 2000.0),
];

const KICK: [TimbrePreset; 4] = [
    TimbrePreset::tone("deep", Waveform::Sine, LowPass, 100.0),
    TimbrePreset::tone("punchy", Waveform::Triangle, LowPass, 150.0),
    TimbrePreset::tone("boomy", Waveform::Sine, LowPass, 80.0),
    TimbrePreset::tone("tight", Waveform::Square, LowPass, 120.0),
];

/// All timbres for `voice`, default first.
pub fn presets(voice: Voice) -> &'static [TimbrePreset] {
    match voice {
        Voice::Hihat => &HIHAT,
        Voice::Snare => &SNARE,
        Voice::Kick => &KICK,
    }
}

pub fn preset(voice: Voice, name: &str) -> Option<&'static TimbrePreset> {
    presets(voice).iter().find(|p| p.name == name)
}

pub fn default_preset(voice: Voice) -> &'static TimbrePreset {
    &presets(voice)[0]
}

/// The timbre after (or before, when `forward` is false) `current`,
/// wrapping around. An unknown name starts from the default.
pub fn cycle(voice: Voice, current: &str, forward: bool) -> &'static TimbrePreset {
    let table = presets(voice);
    let Some(pos) = table.iter().position(|p| p.name == current) else {
        return default_preset(voice);
    };
    let next = if forward {
        (pos + 1) % table.len()
    } else {
        (pos + table.len() - 1) % table.len()
    };
    &table[next]
}
