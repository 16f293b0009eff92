use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Exponential Decay Envelope
==========================

Drum hits have no sustain: the level jumps to its peak the instant the hit
starts and then falls away. Acoustic decays are exponential, so the envelope
multiplies the level by a constant ratio every sample instead of subtracting
a constant step.

Vocabulary
----------

  start       The level at the first sample (the voice volume, 0.0 to 1.0).

  floor       The level reached exactly at the end of the decay. Fixed at
              0.01 (-40 dB relative to full scale), the same target a browser
              `exponentialRampToValueAtTime(0.01, ...)` uses.

  duration    Seconds from start to floor.


The Shape
---------

    level(t) = start · (floor / start)^(t / duration)

  Level
  start ┐╲
        │ ╲
        │  ╲__
        │     ‾‾‾──___
  0.01  └──────────────‾‾‾──→ Time
        0             duration

Per sample this is a single multiply by

    ratio = (floor / start)^(1 / (duration · sample_rate))

After the decay completes the envelope holds the floor; the hit buffer ends
there, so nothing after that point is ever heard.

A start of zero cannot ramp exponentially (there is no ratio from 0), so a
silent hit is exactly silent.
*/

/// Level the decay lands on at `duration`.
pub const DECAY_FLOOR: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayStage {
    Idle,
    Decaying,
    Done,
}

pub struct DecayEnvelope {
    start: f32,
    duration: f32,

    stage: DecayStage,
    level: f32,
    ratio: f32,
    remaining_samples: u32,
}

impl DecayEnvelope {
    pub fn new(start: f32, duration: f32) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            duration: duration.max(MIN_TIME),
            stage: DecayStage::Idle,
            level: 0.0,
            ratio: 1.0,
            remaining_samples: 0,
        }
    }

    /// Start the decay from the top.
    pub fn note_on(&mut self, ctx: &RenderCtx) {
        let total = (self.duration * ctx.sample_rate).round().max(1.0);
        self.remaining_samples = total as u32;
        self.level = self.start;
        self.stage = DecayStage::Decaying;

        self.ratio = if self.start > DECAY_FLOOR {
            (DECAY_FLOOR / self.start).powf(1.0 / total)
        } else {
            1.0
        };
    }

    /// Current level, then advance one sample.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            DecayStage::Idle => 0.0,
            DecayStage::Done => self.level,
            DecayStage::Decaying => {
                let out = self.level;
                self.level *= self.ratio;
                self.remaining_samples = self.remaining_samples.saturating_sub(1);
                if self.remaining_samples == 0 {
                    self.level = self.start.min(DECAY_FLOOR);
                    self.stage = DecayStage::Done;
                }
                out
            }
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.stage, DecayStage::Decaying)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> DecayStage {
        self.stage
    }
}
