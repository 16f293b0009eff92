//! Drum voices: the three parts of the grid and how each one is synthesized.
//!
//! A voice is never a long-lived graph. Every hit builds a fresh node graph
//! from a snapshot of the voice's settings and renders it offline into a
//! [`RenderedHit`], which the audio backend then plays.
//!
//! # Available voices
//!
//! - [`Voice::Hihat`] - tonal tick, oscillator through a filter
//! - [`Voice::Snare`] - filtered noise burst
//! - [`Voice::Kick`] - low tonal thump, oscillator through a lowpass
//!
//! # Example
//!
//! ```
//! use drumgrid::voices::{presets, SynthMode, Voice, VoiceSettings, VoiceSynthesizer};
//!
//! let synth = VoiceSynthesizer::new(44_100.0, SynthMode::Full);
//! let settings = VoiceSettings::default_for(Voice::Kick);
//! let preset = presets::preset(Voice::Kick, &settings.timbre).unwrap();
//! let hit = synth.render(Voice::Kick, &settings, preset);
//! assert_eq!(hit.samples.len(), 17_640);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod presets;
pub mod settings;
pub mod synth;

pub use presets::{Source, TimbrePreset};
pub use settings::{SettingChange, VoiceSettings, VoiceTable};
pub use synth::{RenderedHit, SynthMode, VoiceSynthesizer};

/// One row of the step grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Hihat,
    Snare,
    Kick,
}

impl Voice {
    /// Grid order, top row first. Voices active on the same step fire in
    /// this order too.
    pub const ALL: [Voice; 3] = [Voice::Hihat, Voice::Snare, Voice::Kick];

    pub const fn index(self) -> usize {
        match self {
            Voice::Hihat => 0,
            Voice::Snare => 1,
            Voice::Kick => 2,
        }
    }

    /// Key used in the persisted pattern format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Voice::Hihat => "hihat",
            Voice::Snare => "snare",
            Voice::Kick => "kick",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Voice::Hihat => "Hi-hat",
            Voice::Snare => "Snare",
            Voice::Kick => "Kick",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown voice {0:?}")]
pub struct ParseVoiceError(pub String);

impl FromStr for Voice {
    type Err = ParseVoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hihat" | "hi-hat" | "hh" => Ok(Voice::Hihat),
            "snare" | "sd" => Ok(Voice::Snare),
            "kick" | "bd" => Ok(Voice::Kick),
            _ => Err(ParseVoiceError(s.to_string())),
        }
    }
}
