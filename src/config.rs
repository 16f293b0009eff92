use std::{ops::RangeInclusive, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{DEFAULT_BPM, DEFAULT_SAMPLE_RATE};

/// Startup configuration for a [`DrumMachine`](crate::DrumMachine).
///
/// ```
/// use drumgrid::MachineConfig;
///
/// let config = MachineConfig::new().bpm(120).sample_rate(48_000.0);
/// assert_eq!(config.bpm, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Render rate used when the backend does not dictate one.
    pub sample_rate: f32,
    pub bpm: u32,
    /// Supported tempi. Ends given the wrong way round are swapped.
    #[serde(deserialize_with = "ordered_range")]
    pub bpm_range: RangeInclusive<u32>,
    /// Gap between stopping and restarting on a tempo change.
    pub restart_delay: Duration,
    /// Play a voice when one of its steps is switched on or its settings
    /// change while stopped.
    pub preview_on_edit: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bpm: DEFAULT_BPM,
            bpm_range: 40..=240,
            restart_delay: Duration::from_millis(50),
            preview_on_edit: true,
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn bpm(mut self, bpm: u32) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn bpm_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.bpm_range = ordered(range);
        self
    }

    pub fn restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn preview_on_edit(mut self, enabled: bool) -> Self {
        self.preview_on_edit = enabled;
        self
    }

    /// `bpm` forced into the supported range.
    pub fn clamp_bpm(&self, bpm: u32) -> u32 {
        clamp_to(bpm, &self.bpm_range)
    }
}

/// Clamp `value` into `range`, whichever way round its ends are.
pub fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    let (lo, hi) = (*range.start(), *range.end());
    value.clamp(lo.min(hi), lo.max(hi))
}

fn ordered(range: RangeInclusive<u32>) -> RangeInclusive<u32> {
    let (lo, hi) = range.into_inner();
    lo.min(hi)..=lo.max(hi)
}

fn ordered_range<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RangeInclusive<u32>, D::Error> {
    RangeInclusive::deserialize(deserializer).map(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MachineConfig::default();
        assert_eq!(config.bpm, 60);
        assert_eq!(config.restart_delay, Duration::from_millis(50));
        assert!(config.preview_on_edit);
    }

    #[test]
    fn clamps_into_range() {
        let config = MachineConfig::new().bpm_range(60..=180);
        assert_eq!(config.clamp_bpm(20), 60);
        assert_eq!(config.clamp_bpm(200), 180);
        assert_eq!(config.clamp_bpm(90), 90);
    }

    #[test]
    fn inverted_range_is_reordered() {
        let config = MachineConfig::new().bpm_range(180..=60);
        assert_eq!(config.bpm_range, 60..=180);
        assert_eq!(config.clamp_bpm(20), 60);
        assert_eq!(config.clamp_bpm(200), 180);
    }

    #[test]
    fn inverted_range_from_json_is_reordered() {
        let config: MachineConfig =
            serde_json::from_str(r#"{ "bpm_range": { "start": 200, "end": 100 } }"#).unwrap();
        assert_eq!(config.bpm_range, 100..=200);
        assert_eq!(config.clamp_bpm(60), 100);
    }

    #[test]
    fn clamp_tolerates_a_backwards_field() {
        let mut config = MachineConfig::new();
        config.bpm_range = 180..=60;
        assert_eq!(config.clamp_bpm(20), 60);
        assert_eq!(config.clamp_bpm(90), 90);
        assert_eq!(config.clamp_bpm(300), 180);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: MachineConfig = serde_json::from_str(r#"{ "bpm": 100 }"#).unwrap();
        assert_eq!(config.bpm, 100);
        assert_eq!(config.bpm_range, 40..=240);
    }
}
