//! Error types shared across the crate.

use crate::voices::Voice;

/// Why a persisted pattern was refused. The machine state is never touched
/// when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("pattern data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("pattern data must be a JSON object")]
    NotAnObject,

    #[error("{voice} has {len} steps, expected {expected}", expected = crate::STEPS)]
    StepCount { voice: Voice, len: usize },

    #[error("invalid tempo: {0}")]
    InvalidTempo(String),
}

/// Failures at the audio output boundary.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("unsupported output configuration: {0}")]
    Config(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("audio backend unavailable")]
    Unavailable,

    #[error("hit queue full, dropped {0}")]
    QueueFull(Voice),
}

/// Rejected voice-setting updates.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("{voice} has no timbre named {name:?}")]
    UnknownTimbre { voice: Voice, name: String },

    #[error("{0} is not a finite number")]
    NotFinite(f32),
}
