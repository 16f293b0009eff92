use serde::{Deserialize, Serialize};

use crate::{voices::Voice, STEPS};

/// One voice's row: `true` where the voice fires.
pub type Steps = [bool; STEPS];

const EMPTY_ROW: Steps = [false; STEPS];

/// The full grid, one row per [`Voice`].
///
/// `Pattern` is `Copy`, so loading a template or a snapshot always copies
/// the rows; edits to the loaded grid never reach the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Rows", into = "Rows")]
pub struct Pattern {
    rows: [Steps; 3],
}

/// Wire shape of a pattern: `{ "hihat": [..16], "snare": [..16], "kick": [..16] }`.
#[derive(Serialize, Deserialize)]
struct Rows {
    hihat: Steps,
    snare: Steps,
    kick: Steps,
}

impl From<Rows> for Pattern {
    fn from(r: Rows) -> Self {
        Pattern::from_rows(r.hihat, r.snare, r.kick)
    }
}

impl From<Pattern> for Rows {
    fn from(p: Pattern) -> Self {
        Rows {
            hihat: *p.row(Voice::Hihat),
            snare: *p.row(Voice::Snare),
            kick: *p.row(Voice::Kick),
        }
    }
}

/// Build a row from a compact string: `x` is a hit, anything else a rest.
/// Characters past the sixteenth are ignored.
pub const fn row(s: &str) -> Steps {
    let bytes = s.as_bytes();
    let mut out = EMPTY_ROW;
    let mut i = 0;
    while i < bytes.len() && i < STEPS {
        out[i] = bytes[i] == b'x';
        i += 1;
    }
    out
}

impl Pattern {
    pub const EMPTY: Pattern = Pattern {
        rows: [EMPTY_ROW; 3],
    };

    pub const fn from_rows(hihat: Steps, snare: Steps, kick: Steps) -> Self {
        Self {
            rows: [hihat, snare, kick],
        }
    }

    /// Grid shown at startup: snare backbeat on steps 5 and 13.
    pub const fn initial() -> Self {
        Self::from_rows(EMPTY_ROW, row("....x.......x..."), EMPTY_ROW)
    }

    pub fn row(&self, voice: Voice) -> &Steps {
        &self.rows[voice.index()]
    }

    pub fn row_mut(&mut self, voice: Voice) -> &mut Steps {
        &mut self.rows[voice.index()]
    }

    /// Out-of-range steps are never active.
    pub fn is_active(&self, voice: Voice, step: usize) -> bool {
        self.row(voice).get(step).copied().unwrap_or(false)
    }

    /// Voices firing on `step`, in grid order.
    pub fn active_voices(&self, step: usize) -> impl Iterator<Item = Voice> + '_ {
        Voice::ALL
            .into_iter()
            .filter(move |&voice| self.is_active(voice, step))
    }

    pub fn active_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&on| on).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Owns the live grid.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    pattern: Pattern,
}

impl PatternStore {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Flip one step and return its new state, or `None` when `index` is
    /// past the end of the row.
    pub fn toggle_step(&mut self, voice: Voice, index: usize) -> Option<bool> {
        let step = self.pattern.row_mut(voice).get_mut(index)?;
        *step = !*step;
        Some(*step)
    }

    pub fn clear_voice(&mut self, voice: Voice) {
        *self.pattern.row_mut(voice) = EMPTY_ROW;
    }

    pub fn clear_all(&mut self) {
        self.pattern = Pattern::EMPTY;
    }

    /// Replace the whole grid with a copy of `pattern`.
    pub fn load(&mut self, pattern: &Pattern) {
        self.pattern = *pattern;
    }

    pub fn active_voices(&self, step: usize) -> impl Iterator<Item = Voice> + '_ {
        self.pattern.active_voices(step)
    }

    pub fn active_count(&self) -> usize {
        self.pattern.active_count()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}
