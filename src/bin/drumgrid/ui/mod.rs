//! TUI rendering for drumgrid

mod grid;
mod transport;
mod voices;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use drumgrid::{
    voices::{SynthMode, VoiceSettings},
    MachineView,
};

use crate::app::Cursor;

use grid::render_grid;
use transport::render_transport;
use voices::render_voices;

/// Everything one frame shows.
pub struct Screen<'a> {
    pub view: MachineView,
    /// In grid order.
    pub settings: [&'a VoiceSettings; 3],
    pub cursor: Cursor,
    pub flashing: [bool; 3],
    pub status: String,
    pub template: Option<&'static str>,
    pub mode: SynthMode,
}

const HELP: &str = " [Space] Play/Stop  [K/S/H] Hit  [Arrows] Move  [Enter] Toggle  [X] Clear row  \
[^C] Clear all  [+/-] Tempo  [T] Template  [ [ ] ] Timbre  [p/P v/V d/D] Tune  [E/I] Save/Load  [Q] Quit";

pub fn render(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Length(6), // Step grid
            Constraint::Length(5), // Voice settings
            Constraint::Length(1), // Status
            Constraint::Min(1),    // Help
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], screen);
    render_grid(frame, chunks[1], screen);
    render_voices(frame, chunks[2], screen);

    let status = Paragraph::new(format!(" {}", screen.status)).style(Style::default().fg(Color::White));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}
