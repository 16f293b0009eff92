//! Transport bar widget - BPM, play state, step and engine mode

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use drumgrid::{voices::SynthMode, STEPS};

use super::Screen;

pub fn render_transport(frame: &mut Frame, area: Rect, screen: &Screen) {
    let block = Block::default().title(" drumgrid ").borders(Borders::ALL);
    let view = &screen.view;

    let (symbol, state) = if view.is_playing {
        ("▶", "Playing")
    } else {
        ("■", "Stopped")
    };

    let step = match view.playhead() {
        Some(step) => format!("Step: {:>2}/{STEPS}  ", step + 1),
        None => "Step: --  ".to_string(),
    };

    let mut spans = vec![
        Span::styled(format!(" BPM: {}  ", view.bpm), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{symbol} {state}  "),
            Style::default().fg(if view.is_playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(step, Style::default().fg(Color::White)),
    ];

    if let Some(id) = screen.template {
        spans.push(Span::styled(format!("Template: {id}  "), Style::default().fg(Color::DarkGray)));
    }
    if screen.mode == SynthMode::Fallback {
        spans.push(Span::styled("Fallback beeps", Style::default().fg(Color::Red)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
