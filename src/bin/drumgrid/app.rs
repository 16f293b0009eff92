//! Event loop and key bindings.

use std::{
    cell::RefCell,
    fs,
    rc::Rc,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use drumgrid::{
    sequencing::Template,
    voices::SettingChange,
    DrumMachine, MachineObserver, Voice, STEPS,
};

use crate::ui::{self, Screen};

/// Longest the loop waits for input before polling the scheduler again.
const POLL_INTERVAL: Duration = Duration::from_millis(4);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// How long a voice label stays lit after it fires.
const FLASH: Duration = Duration::from_millis(200);
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);
const EXPORT_PATH: &str = "drumgrid.json";

/// Last time each voice fired, fed by the machine's trigger hook.
#[derive(Default)]
struct Flashes {
    fired: [Option<Instant>; 3],
    dirty: bool,
}

struct FlashObserver(Rc<RefCell<Flashes>>);

impl MachineObserver for FlashObserver {
    fn on_refresh(&mut self, _view: &drumgrid::MachineView) {
        self.0.borrow_mut().dirty = true;
    }

    fn on_voice_triggered(&mut self, voice: Voice) {
        let mut flashes = self.0.borrow_mut();
        flashes.fired[voice.index()] = Some(Instant::now());
        flashes.dirty = true;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    pub row: usize,
    pub step: usize,
}

impl Cursor {
    pub fn voice(&self) -> Voice {
        Voice::ALL[self.row]
    }
}

pub struct App {
    machine: DrumMachine,
    cursor: Cursor,
    flashes: Rc<RefCell<Flashes>>,
    message: Option<(String, Instant)>,
    should_quit: bool,
}

impl App {
    pub fn new(mut machine: DrumMachine) -> Self {
        let flashes = Rc::new(RefCell::new(Flashes::default()));
        machine.subscribe(Box::new(FlashObserver(flashes.clone())));

        Self {
            machine,
            cursor: Cursor::default(),
            flashes,
            message: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last_draw: Option<Instant> = None;

        while !self.should_quit {
            self.machine.poll();

            let due = last_draw.map_or(true, |t| t.elapsed() >= FRAME_INTERVAL);
            let dirty = std::mem::take(&mut self.flashes.borrow_mut().dirty);
            if dirty || due {
                terminal.draw(|frame| ui::render(frame, &self.screen()))?;
                last_draw = Some(Instant::now());
            }

            let wait = self
                .machine
                .time_until_next()
                .map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));
            if event::poll(wait)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn screen(&self) -> Screen<'_> {
        let now = Instant::now();
        let flashes = self.flashes.borrow();
        let flashing = Voice::ALL.map(|v| {
            flashes.fired[v.index()].is_some_and(|t| now.duration_since(t) < FLASH)
        });
        let message = self
            .message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < MESSAGE_TIMEOUT)
            .map(|(text, _)| text.as_str());

        Screen {
            view: self.machine.view(),
            settings: Voice::ALL.map(|v| self.machine.settings(v)),
            cursor: self.cursor,
            flashing,
            status: message.map_or_else(|| self.machine.status_line(), str::to_string),
            template: self.machine.current_template(),
            mode: self.machine.synth_mode(),
        }
    }

    fn say(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now()));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Any key counts as the first user interaction.
        self.machine.resume_audio();

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let voice = self.cursor.voice();

        match key.code {
            KeyCode::Char('c') if ctrl => self.machine.clear_all(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.machine.toggle_playback();
            }

            KeyCode::Char('k') => self.machine.trigger(Voice::Kick),
            KeyCode::Char('s') => self.machine.trigger(Voice::Snare),
            KeyCode::Char('h') => self.machine.trigger(Voice::Hihat),

            KeyCode::Up => self.cursor.row = self.cursor.row.saturating_sub(1),
            KeyCode::Down => self.cursor.row = (self.cursor.row + 1).min(Voice::ALL.len() - 1),
            KeyCode::Left => self.cursor.step = (self.cursor.step + STEPS - 1) % STEPS,
            KeyCode::Right => self.cursor.step = (self.cursor.step + 1) % STEPS,
            KeyCode::Enter => {
                self.machine.toggle_step(voice, self.cursor.step);
            }
            KeyCode::Char('x') => self.machine.clear_voice(voice),

            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_tempo(1),
            KeyCode::Char('-') => self.nudge_tempo(-1),
            KeyCode::PageUp => self.nudge_tempo(10),
            KeyCode::PageDown => self.nudge_tempo(-10),

            KeyCode::Char('t') => {
                let next = Template::next_after(self.machine.current_template());
                self.machine.load_template(next.id);
                self.say(format!("Loaded template: {}", next.name));
            }

            KeyCode::Char('[') => self.edit(voice, |m, v| m.cycle_timbre(v, false)),
            KeyCode::Char(']') => self.edit(voice, |m, v| m.cycle_timbre(v, true)),
            KeyCode::Char('p') => self.scale_pitch(voice, 1.0 / 1.05),
            KeyCode::Char('P') => self.scale_pitch(voice, 1.05),
            KeyCode::Char('v') => {
                let volume = self.machine.settings(voice).volume - 0.05;
                self.edit(voice, |m, v| m.update_voice_setting(v, SettingChange::Volume(volume)));
            }
            KeyCode::Char('V') => {
                let volume = self.machine.settings(voice).volume + 0.05;
                self.edit(voice, |m, v| m.update_voice_setting(v, SettingChange::Volume(volume)));
            }
            KeyCode::Char('d') => {
                let duration = self.machine.settings(voice).duration - 0.02;
                self.edit(voice, |m, v| m.update_voice_setting(v, SettingChange::Duration(duration)));
            }
            KeyCode::Char('D') => {
                let duration = self.machine.settings(voice).duration + 0.02;
                self.edit(voice, |m, v| m.update_voice_setting(v, SettingChange::Duration(duration)));
            }

            KeyCode::Char('e') => self.export(),
            KeyCode::Char('i') => self.import(),
            _ => {}
        }
    }

    fn nudge_tempo(&mut self, delta: i32) {
        let bpm = self.machine.bpm().saturating_add_signed(delta);
        self.machine.set_tempo(bpm);
    }

    fn scale_pitch(&mut self, voice: Voice, factor: f32) {
        let pitch = self.machine.settings(voice).pitch * factor;
        self.edit(voice, |m, v| m.update_voice_setting(v, SettingChange::Pitch(pitch)));
    }

    fn edit<E: std::fmt::Display>(
        &mut self,
        voice: Voice,
        op: impl FnOnce(&mut DrumMachine, Voice) -> Result<(), E>,
    ) {
        if let Err(e) = op(&mut self.machine, voice) {
            self.say(format!("{voice}: {e}"));
        }
    }

    fn export(&mut self) {
        let result = self
            .machine
            .export_json()
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(EXPORT_PATH, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => self.say(format!("Saved pattern to {EXPORT_PATH}")),
            Err(e) => {
                tracing::warn!("export failed: {e}");
                self.say(format!("Export failed: {e}"));
            }
        }
    }

    fn import(&mut self) {
        let raw = match fs::read_to_string(EXPORT_PATH) {
            Ok(raw) => raw,
            Err(e) => {
                self.say(format!("Cannot read {EXPORT_PATH}: {e}"));
                return;
            }
        };
        match self.machine.import_pattern(&raw) {
            Ok(()) => self.say(format!("Loaded pattern from {EXPORT_PATH}")),
            Err(e) => self.say(format!("Import failed: {e}")),
        }
    }
}
