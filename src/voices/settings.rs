use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

use super::{presets, Voice};

/// Shortest and longest hit, in seconds.
pub const DURATION_RANGE: RangeInclusive<f32> = 0.01..=2.0;
pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// User-tunable parameters of one voice. Synthesis reads a clone, so an
/// edit never lands halfway through a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Key into the voice's preset table.
    pub timbre: String,
    /// Oscillator frequency for tonal voices, filter cutoff for noise voices (Hz).
    pub pitch: f32,
    pub volume: f32,
    /// Seconds.
    pub duration: f32,
}

impl VoiceSettings {
    pub fn default_for(voice: Voice) -> Self {
        let (pitch, volume, duration) = match voice {
            Voice::Hihat => (4000.0, 0.4, 0.1),
            Voice::Snare => (1000.0, 0.6, 0.2),
            Voice::Kick => (60.0, 0.8, 0.4),
        };
        Self {
            timbre: presets::default_preset(voice).name.to_string(),
            pitch,
            volume,
            duration,
        }
    }
}

impl Voice {
    /// Pitch bounds offered by the controls.
    pub fn pitch_range(self) -> RangeInclusive<f32> {
        match self {
            Voice::Hihat => 2000.0..=12000.0,
            Voice::Snare => 200.0..=5000.0,
            Voice::Kick => 30.0..=200.0,
        }
    }
}

/// One `field = value` edit of a voice's settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    Timbre(String),
    Pitch(f32),
    Volume(f32),
    Duration(f32),
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> Result<f32, SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::NotFinite(value));
    }
    Ok(value.clamp(*range.start(), *range.end()))
}

/// Settings for all three voices, indexed by [`Voice`].
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTable {
    settings: [VoiceSettings; 3],
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self {
            settings: Voice::ALL.map(VoiceSettings::default_for),
        }
    }
}

impl VoiceTable {
    pub fn get(&self, voice: Voice) -> &VoiceSettings {
        &self.settings[voice.index()]
    }

    /// Apply one edit. Numbers are clamped to the voice's bounds; an unknown
    /// timbre or a non-finite number leaves the settings untouched.
    pub fn apply(&mut self, voice: Voice, change: SettingChange) -> Result<(), SettingsError> {
        let settings = &mut self.settings[voice.index()];
        match change {
            SettingChange::Timbre(name) => {
                let preset = presets::preset(voice, &name)
                    .ok_or(SettingsError::UnknownTimbre { voice, name })?;
                settings.timbre = preset.name.to_string();
            }
            SettingChange::Pitch(hz) => settings.pitch = clamp_to(hz, &voice.pitch_range())?,
            SettingChange::Volume(v) => settings.volume = clamp_to(v, &VOLUME_RANGE)?,
            SettingChange::Duration(s) => settings.duration = clamp_to(s, &DURATION_RANGE)?,
        }
        Ok(())
    }
}
