use std::ops::RangeInclusive;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{config::clamp_to, error::ImportError, voices::Voice, DEFAULT_BPM, STEPS};

use super::pattern::{Pattern, Steps};

/// Persisted form of the machine: `{ "bpm": 120, "patterns": { "kick": [..16], ... } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub bpm: u32,
    pub patterns: Pattern,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate persisted text. Tempo is clamped into `bpm_range`.
    pub fn parse(raw: &str, bpm_range: &RangeInclusive<u32>) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value, bpm_range)
    }

    /// Validation rules:
    ///
    /// - the top level must be an object
    /// - `bpm` missing, `null` or `0` means the default tempo; any other value
    ///   must be a non-negative whole number
    /// - a voice array with other than 16 entries rejects the whole import
    /// - a missing voice, or one that is not an array of booleans, is empty
    /// - unknown keys are ignored
    pub fn from_value(value: &Value, bpm_range: &RangeInclusive<u32>) -> Result<Self, ImportError> {
        let obj = value.as_object().ok_or(ImportError::NotAnObject)?;

        let bpm = clamp_to(parse_bpm(obj.get("bpm"))?, bpm_range);
        let patterns = match obj.get("patterns") {
            Some(Value::Object(rows)) => parse_rows(rows)?,
            Some(Value::Null) | None => Pattern::EMPTY,
            Some(other) => {
                tracing::debug!("ignoring non-object patterns: {other}");
                Pattern::EMPTY
            }
        };

        Ok(Self { bpm, patterns })
    }
}

fn parse_bpm(value: Option<&Value>) -> Result<u32, ImportError> {
    let n = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_BPM),
        Some(Value::Number(n)) => n,
        Some(other) => return Err(ImportError::InvalidTempo(other.to_string())),
    };

    let whole = match (n.as_u64(), n.as_f64()) {
        (Some(u), _) => u,
        (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 => f as u64,
        _ => return Err(ImportError::InvalidTempo(n.to_string())),
    };

    Ok(match whole {
        0 => DEFAULT_BPM,
        w => u32::try_from(w).unwrap_or(u32::MAX),
    })
}

fn parse_rows(rows: &Map<String, Value>) -> Result<Pattern, ImportError> {
    let mut pattern = Pattern::EMPTY;
    for voice in Voice::ALL {
        if let Some(steps) = parse_row(voice, rows.get(voice.as_str()))? {
            *pattern.row_mut(voice) = steps;
        }
    }
    Ok(pattern)
}

fn parse_row(voice: Voice, value: Option<&Value>) -> Result<Option<Steps>, ImportError> {
    let items = match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Ok(None),
        Some(other) => {
            tracing::debug!(%voice, "treating non-array row as empty: {other}");
            return Ok(None);
        }
    };

    if items.len() != STEPS {
        return Err(ImportError::StepCount {
            voice,
            len: items.len(),
        });
    }

    let mut steps = [false; STEPS];
    for (step, item) in steps.iter_mut().zip(items) {
        match item.as_bool() {
            Some(on) => *step = on,
            None => {
                tracing::debug!(%voice, "treating row with non-boolean step as empty");
                return Ok(None);
            }
        }
    }
    Ok(Some(steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::{pattern::row, templates::Template};
    use serde_json::json;

    const RANGE: RangeInclusive<u32> = 40..=240;

    #[test]
    fn test_round_trip() {
        let snapshot = Snapshot {
            bpm: 97,
            patterns: Template::by_id("funk").unwrap().pattern,
        };
        let text = snapshot.to_json().unwrap();
        assert_eq!(Snapshot::parse(&text, &RANGE).unwrap(), snapshot);
    }

    #[test]
    fn test_wire_shape() {
        let snapshot = Snapshot {
            bpm: 120,
            patterns: Pattern::initial(),
        };
        let value = serde_json::to_value(snapshot).unwrap();
        assert_eq!(value["bpm"], 120);
        assert_eq!(value["patterns"]["snare"][12], true);
        assert_eq!(value["patterns"]["hihat"].as_array().unwrap().len(), 16);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let data = json!({ "bpm": 90, "patterns": { "kick": vec![false; 15] } });
        let err = Snapshot::from_value(&data, &RANGE).unwrap_err();
        assert!(matches!(
            err,
            ImportError::StepCount {
                voice: Voice::Kick,
                len: 15
            }
        ));
    }

    #[test]
    fn test_missing_parts_default() {
        let data = json!({ "patterns": { "snare": row("....x.......x...") } });
        let snapshot = Snapshot::from_value(&data, &RANGE).unwrap();
        assert_eq!(snapshot.bpm, 60);
        assert_eq!(snapshot.patterns, Pattern::initial());

        let empty = Snapshot::from_value(&json!({}), &RANGE).unwrap();
        assert_eq!(empty.patterns, Pattern::EMPTY);
    }

    #[test]
    fn test_malformed_voice_is_empty() {
        let mut steps = vec![json!(true); 16];
        steps[3] = json!("yes");
        let data = json!({
            "bpm": 100,
            "patterns": { "kick": steps, "hihat": "x.x.", "snare": null, "cowbell": [true] }
        });
        let snapshot = Snapshot::from_value(&data, &RANGE).unwrap();
        assert!(snapshot.patterns.is_empty());
    }

    #[test]
    fn test_tempo_rules() {
        let bpm = |v: Value| Snapshot::from_value(&json!({ "bpm": v }), &RANGE).map(|s| s.bpm);

        assert_eq!(bpm(json!(0)).unwrap(), 60);
        assert_eq!(bpm(json!(null)).unwrap(), 60);
        assert_eq!(bpm(json!(128.0)).unwrap(), 128);
        assert_eq!(bpm(json!(10)).unwrap(), 40);
        assert_eq!(bpm(json!(1_000_000)).unwrap(), 240);
        assert!(matches!(bpm(json!(-5)), Err(ImportError::InvalidTempo(_))));
        assert!(matches!(bpm(json!(90.5)), Err(ImportError::InvalidTempo(_))));
        assert!(matches!(bpm(json!("90")), Err(ImportError::InvalidTempo(_))));
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(matches!(
            Snapshot::parse("[1, 2, 3]", &RANGE),
            Err(ImportError::NotAnObject)
        ));
        assert!(matches!(
            Snapshot::parse("{ not json", &RANGE),
            Err(ImportError::Parse(_))
        ));
    }
}
