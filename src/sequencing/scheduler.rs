use std::time::Duration;

use crate::STEPS;

/*
Step Scheduler
==============

A one-shot timer loop with a single, owned timer slot:

      play()                      tick due
  Stopped ──────→ Running ──────────────────┐
     ↑   fire step 0, arm next    ↑         │ fire current step, advance,
     │                            └─────────┘ arm next
     │ stop(): clear slot, step = 0
     └──────────────────────────── Running

Nothing fires on its own. The host calls `poll(now, ..)` from its event
loop and the scheduler fires whatever timer is due at `now`.

Only one timer can ever be pending, so two loops can never tick at once:
arming replaces the slot and `stop()` empties it.

Grid stability
--------------

Each tick arms the next one relative to the time the tick was DUE, not the
time it was noticed, so polling jitter does not accumulate:

    due:  0     125    250    375 ms      (120 BPM)
    seen: 0.4   126.1  250.3  377.9

If the host stalls for more than one whole interval the grid re-anchors
to `now` instead of firing a burst of late steps.

Tempo changes
-------------

A tempo change while running stops playback and arms a `Restart` timer a
short settling delay later. When it fires, playback starts again from
step 0 at the new interval.
*/

/// Length of one sixteenth note at `bpm`, in milliseconds.
pub fn step_interval_ms(bpm: u32) -> f64 {
    (60.0 / bpm.max(1) as f64 / 4.0) * 1000.0
}

pub fn step_interval(bpm: u32) -> Duration {
    Duration::from_secs_f64(step_interval_ms(bpm) / 1000.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Play the current step and advance.
    Step,
    /// Start playback again after a tempo change.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub kind: TimerKind,
    pub due: Duration,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    transport: Transport,
    current_step: usize,
    bpm: u32,
    restart_delay: Duration,
    pending: Option<PendingTimer>,
}

impl Scheduler {
    pub fn new(bpm: u32, restart_delay: Duration) -> Self {
        Self {
            transport: Transport::Stopped,
            current_step: 0,
            bpm: bpm.max(1),
            restart_delay,
            pending: None,
        }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport == Transport::Running
    }

    /// Step the next tick will play.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn interval(&self) -> Duration {
        step_interval(self.bpm)
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    /// How long the host may sleep before the next `poll` has work.
    pub fn time_until_next(&self, now: Duration) -> Option<Duration> {
        self.pending.map(|t| t.due.saturating_sub(now))
    }

    /// Start from step 0. `fire` receives step 0 before this returns.
    ///
    /// Returns false, doing nothing, when already running.
    pub fn play(&mut self, now: Duration, mut fire: impl FnMut(usize)) -> bool {
        if self.is_playing() {
            return false;
        }

        self.transport = Transport::Running;
        self.current_step = 0;
        self.fire_step(now, now, &mut fire);
        true
    }

    /// Stop and rewind. Returns whether a pending timer was cancelled.
    pub fn stop(&mut self) -> bool {
        self.transport = Transport::Stopped;
        self.current_step = 0;
        self.pending.take().is_some()
    }

    /// Change tempo. While running (or waiting to restart) this stops and
    /// arms a restart after the settling delay; returns whether it did.
    pub fn set_tempo(&mut self, bpm: u32, now: Duration) -> bool {
        self.bpm = bpm.max(1);

        let restarting = matches!(
            self.pending,
            Some(PendingTimer {
                kind: TimerKind::Restart,
                ..
            })
        );
        if !self.is_playing() && !restarting {
            return false;
        }

        self.stop();
        self.pending = Some(PendingTimer {
            kind: TimerKind::Restart,
            due: now + self.restart_delay,
        });
        true
    }

    /// Fire the pending timer if it is due at `now`.
    pub fn poll(&mut self, now: Duration, mut fire: impl FnMut(usize)) -> Option<TimerKind> {
        let timer = self.pending.filter(|t| t.due <= now)?;
        self.pending = None;

        match timer.kind {
            TimerKind::Step => self.fire_step(timer.due, now, &mut fire),
            TimerKind::Restart => {
                self.play(now, &mut fire);
            }
        }
        Some(timer.kind)
    }

    fn fire_step(&mut self, due: Duration, now: Duration, fire: &mut impl FnMut(usize)) {
        fire(self.current_step);
        self.current_step = (self.current_step + 1) % STEPS;

        let interval = self.interval();
        let anchor = if now.saturating_sub(due) > interval {
            tracing::debug!(late_by = ?(now - due), "scheduler fell behind, re-anchoring");
            now
        } else {
            due
        };
        self.pending = Some(PendingTimer {
            kind: TimerKind::Step,
            due: anchor + interval,
        });
    }
}
