//! The instrument: pattern, voice settings, scheduler and audio output
//! behind one object that a host event loop drives.
//!
//! ```
//! use drumgrid::{backend::RecordingBackend, sequencing::ManualClock, voices::SynthMode};
//! use drumgrid::{DrumMachine, MachineConfig, Voice};
//!
//! let clock = ManualClock::new();
//! let (backend, hits) = RecordingBackend::new(44_100.0);
//! let config = MachineConfig::new().bpm(120);
//! let mut machine = DrumMachine::with_clock(config, Box::new(backend), SynthMode::Full, clock.clone());
//!
//! machine.toggle_step(Voice::Kick, 0);
//! hits.clear();
//! machine.play();
//! assert_eq!(hits.voices(), vec![Voice::Kick]);
//!
//! clock.advance_ms(125);
//! assert!(machine.poll());
//! ```

use std::time::Duration;

use crate::{
    backend::{AudioBackend, NullBackend},
    config::MachineConfig,
    error::{BackendError, ImportError, SettingsError},
    sequencing::{Clock, Pattern, PatternStore, Scheduler, Snapshot, SystemClock, Template},
    voices::{presets, SettingChange, SynthMode, Voice, VoiceSettings, VoiceSynthesizer, VoiceTable},
    STEPS,
};

/// Everything a view needs to redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineView {
    pub is_playing: bool,
    /// Step the next tick will play.
    pub current_step: usize,
    pub bpm: u32,
    pub pattern: Pattern,
}

impl MachineView {
    /// Step that sounded last, while playing.
    pub fn playhead(&self) -> Option<usize> {
        self.is_playing
            .then(|| (self.current_step + STEPS - 1) % STEPS)
    }
}

/// Receives state changes. Both hooks default to doing nothing.
pub trait MachineObserver {
    /// After every state change.
    fn on_refresh(&mut self, _view: &MachineView) {}

    /// Whenever a voice fires, from playback or by hand.
    fn on_voice_triggered(&mut self, _voice: Voice) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observers = Vec<(ObserverId, Box<dyn MachineObserver>)>;

pub struct DrumMachine<C: Clock = SystemClock> {
    config: MachineConfig,
    clock: C,
    store: PatternStore,
    voices: VoiceTable,
    scheduler: Scheduler,
    synth: VoiceSynthesizer,
    backend: Box<dyn AudioBackend>,
    observers: Observers,
    next_observer: u64,
    template: Option<&'static str>,
}

impl DrumMachine<SystemClock> {
    pub fn new(config: MachineConfig, backend: Box<dyn AudioBackend>) -> Self {
        Self::with_clock(config, backend, SynthMode::Full, SystemClock::new())
    }

    /// No audio at all: every trigger is a no-op, everything else works.
    pub fn silent(config: MachineConfig) -> Self {
        let backend = Box::new(NullBackend::new(config.sample_rate));
        Self::new(config, backend)
    }

    /// Open the default output device.
    ///
    /// A device that cannot run at the configured rate is opened at its own
    /// rate and still gets full synthesis. If the device cannot be opened
    /// that way, a second attempt on its default configuration plays plain
    /// beeps; if there is no usable device it runs silent. None of these is
    /// an error.
    #[cfg(feature = "device")]
    pub fn open(config: MachineConfig) -> Self {
        use crate::backend::CpalBackend;

        let (backend, mode) = bring_up(
            config.sample_rate,
            |rate| CpalBackend::open(Some(rate)),
            CpalBackend::open_default,
        );
        Self::with_clock(config, backend, mode, SystemClock::new())
    }
}

/// Choose an output and synthesis mode given two ways of opening a device:
/// at `sample_rate`, and at whatever the device prefers.
#[cfg_attr(not(feature = "device"), allow(dead_code))]
fn bring_up<B: AudioBackend + 'static>(
    sample_rate: f32,
    open_at: impl FnOnce(f32) -> Result<B, BackendError>,
    mut open_any: impl FnMut() -> Result<B, BackendError>,
) -> (Box<dyn AudioBackend>, SynthMode) {
    let failure = match open_at(sample_rate) {
        Ok(backend) => return (Box::new(backend), SynthMode::Full),
        // Rendering follows the backend's rate, so a rate mismatch is not a
        // reason to degrade.
        Err(BackendError::Config(reason)) => {
            tracing::warn!(
                sample_rate,
                "output cannot run at the configured rate ({reason}), using the device rate"
            );
            match open_any() {
                Ok(backend) => return (Box::new(backend), SynthMode::Full),
                Err(e) => e,
            }
        }
        Err(e) => e,
    };

    tracing::warn!("audio output init failed: {failure}. Falling back to beeps.");
    match open_any() {
        Ok(backend) => (Box::new(backend), SynthMode::Fallback),
        Err(e) => {
            tracing::warn!("fallback audio output failed: {e}. Audio disabled.");
            (Box::new(NullBackend::new(sample_rate)), SynthMode::Full)
        }
    }
}

impl<C: Clock> DrumMachine<C> {
    pub fn with_clock(
        config: MachineConfig,
        backend: Box<dyn AudioBackend>,
        mode: SynthMode,
        clock: C,
    ) -> Self {
        let bpm = config.clamp_bpm(config.bpm);
        let synth = VoiceSynthesizer::new(backend.sample_rate(), mode);
        tracing::debug!(bpm, ?mode, sample_rate = synth.sample_rate(), "drum machine ready");

        Self {
            scheduler: Scheduler::new(bpm, config.restart_delay),
            config,
            clock,
            store: PatternStore::new(Pattern::initial()),
            voices: VoiceTable::default(),
            synth,
            backend,
            observers: Vec::new(),
            next_observer: 0,
            template: None,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn synth_mode(&self) -> SynthMode {
        self.synth.mode()
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn current_step(&self) -> usize {
        self.scheduler.current_step()
    }

    pub fn bpm(&self) -> u32 {
        self.scheduler.bpm()
    }

    pub fn pattern(&self) -> &Pattern {
        self.store.pattern()
    }

    pub fn settings(&self, voice: Voice) -> &VoiceSettings {
        self.voices.get(voice)
    }

    /// Id of the last template loaded, if the grid came from one.
    pub fn current_template(&self) -> Option<&'static str> {
        self.template
    }

    pub fn view(&self) -> MachineView {
        MachineView {
            is_playing: self.is_playing(),
            current_step: self.current_step(),
            bpm: self.bpm(),
            pattern: *self.store.pattern(),
        }
    }

    pub fn status_line(&self) -> String {
        if self.is_playing() {
            return format!("Playing - BPM: {}", self.bpm());
        }
        match self.store.active_count() {
            0 => "Toggle some steps to build a pattern!".to_string(),
            1 => "Pattern ready - 1 step active".to_string(),
            n => format!("Pattern ready - {n} steps active"),
        }
    }

    // Observers

    pub fn subscribe(&mut self, observer: Box<dyn MachineObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        let view = self.view();
        for (_, observer) in self.observers.iter_mut() {
            observer.on_refresh(&view);
        }
    }

    // Transport

    pub fn play(&mut self) -> bool {
        self.resume_audio();
        let started = self.drive(|scheduler, now, fire| scheduler.play(now, fire));
        if started {
            tracing::info!(bpm = self.bpm(), "playback started");
            self.notify();
        }
        started
    }

    pub fn stop(&mut self) -> bool {
        let cancelled = self.scheduler.stop();
        if cancelled {
            tracing::info!("playback stopped");
        }
        self.notify();
        cancelled
    }

    pub fn toggle_playback(&mut self) -> bool {
        if self.is_playing() {
            self.stop();
        } else {
            self.play();
        }
        self.is_playing()
    }

    /// Set the tempo, clamped to the configured range. Returns the tempo
    /// actually applied. While playing this restarts after a short gap.
    pub fn set_tempo(&mut self, bpm: u32) -> u32 {
        let bpm = self.config.clamp_bpm(bpm);
        let now = self.clock.now();
        if self.scheduler.set_tempo(bpm, now) {
            tracing::info!(bpm, "tempo changed, restarting playback");
        } else {
            tracing::debug!(bpm, "tempo changed");
        }
        self.notify();
        bpm
    }

    /// Fire any timer that is due. Call this from the host event loop.
    /// Returns whether anything fired.
    pub fn poll(&mut self) -> bool {
        let fired = self.drive(|scheduler, now, fire| scheduler.poll(now, fire));
        if fired.is_some() {
            self.notify();
        }
        fired.is_some()
    }

    /// Time until `poll` next has work, if anything is scheduled.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.scheduler.time_until_next(self.clock.now())
    }

    /// Run a scheduler operation with a step callback that triggers every
    /// voice active on the step.
    fn drive<R>(&mut self, op: impl FnOnce(&mut Scheduler, Duration, &mut dyn FnMut(usize)) -> R) -> R {
        let now = self.clock.now();
        let Self {
            scheduler,
            store,
            voices,
            synth,
            backend,
            observers,
            ..
        } = self;

        let mut fire = |step: usize| {
            for voice in store.active_voices(step) {
                fire_voice(synth, backend.as_mut(), observers, voice, voices.get(voice));
            }
        };
        op(scheduler, now, &mut fire)
    }

    // Pattern editing

    /// Flip a step. Switching a step on while stopped previews the voice.
    /// Returns the new state, or `None` for an index past the grid.
    pub fn toggle_step(&mut self, voice: Voice, index: usize) -> Option<bool> {
        let on = self.store.toggle_step(voice, index)?;
        tracing::debug!(%voice, index, on, "step toggled");
        self.template = None;

        if on && !self.is_playing() && self.config.preview_on_edit {
            self.trigger(voice);
        }
        self.notify();
        Some(on)
    }

    /// Stops playback, then empties the grid.
    pub fn clear_all(&mut self) {
        self.scheduler.stop();
        self.store.clear_all();
        self.template = None;
        tracing::info!("pattern cleared");
        self.notify();
    }

    pub fn clear_voice(&mut self, voice: Voice) {
        self.store.clear_voice(voice);
        self.template = None;
        self.notify();
    }

    /// Stops playback, then replaces the grid with a copy of the template.
    /// Returns false for an unknown id.
    pub fn load_template(&mut self, id: &str) -> bool {
        let Some(template) = Template::by_id(id) else {
            tracing::warn!(id, "no such template");
            return false;
        };

        self.scheduler.stop();
        self.store.load(&template.pattern);
        self.template = Some(template.id);
        tracing::info!(id, "template loaded");
        self.notify();
        true
    }

    // Voice settings

    /// Apply one settings edit. While stopped the voice is previewed with
    /// the new settings.
    pub fn update_voice_setting(
        &mut self,
        voice: Voice,
        change: SettingChange,
    ) -> Result<(), SettingsError> {
        self.voices.apply(voice, change)?;
        tracing::debug!(%voice, settings = ?self.voices.get(voice), "voice settings changed");

        if !self.is_playing() && self.config.preview_on_edit {
            self.trigger(voice);
        }
        self.notify();
        Ok(())
    }

    /// Switch `voice` to the next (or previous) timbre in its table.
    pub fn cycle_timbre(&mut self, voice: Voice, forward: bool) -> Result<(), SettingsError> {
        let next = presets::cycle(voice, &self.voices.get(voice).timbre, forward);
        self.update_voice_setting(voice, SettingChange::Timbre(next.name.to_string()))
    }

    // Sound

    /// Play `voice` now, outside the pattern.
    pub fn trigger(&mut self, voice: Voice) {
        self.resume_audio();
        fire_voice(
            &self.synth,
            self.backend.as_mut(),
            &mut self.observers,
            voice,
            self.voices.get(voice),
        );
    }

    /// Resume an output that is waiting for the first user interaction.
    pub fn resume_audio(&mut self) {
        if !self.backend.is_suspended() {
            return;
        }
        match self.backend.resume() {
            Ok(()) => tracing::debug!("audio resumed"),
            Err(e) => tracing::warn!("could not resume audio: {e}"),
        }
    }

    // Persistence

    pub fn export_pattern(&self) -> Snapshot {
        Snapshot {
            bpm: self.bpm(),
            patterns: *self.store.pattern(),
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.export_pattern().to_json_pretty()
    }

    /// Replace tempo and grid from persisted text. On error nothing changes.
    pub fn import_pattern(&mut self, raw: &str) -> Result<(), ImportError> {
        let snapshot = match Snapshot::parse(raw, &self.config.bpm_range) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("pattern import rejected: {e}");
                return Err(e);
            }
        };

        self.store.load(&snapshot.patterns);
        self.template = None;
        let now = self.clock.now();
        self.scheduler.set_tempo(snapshot.bpm, now);
        tracing::info!(
            bpm = snapshot.bpm,
            active = snapshot.patterns.active_count(),
            "pattern imported"
        );
        self.notify();
        Ok(())
    }
}

fn fire_voice(
    synth: &VoiceSynthesizer,
    backend: &mut dyn AudioBackend,
    observers: &mut Observers,
    voice: Voice,
    settings: &VoiceSettings,
) {
    let preset = presets::preset(voice, &settings.timbre).unwrap_or_else(|| presets::default_preset(voice));
    synth.trigger(backend, voice, settings, preset);
    for (_, observer) in observers.iter_mut() {
        observer.on_voice_triggered(voice);
    }
}
