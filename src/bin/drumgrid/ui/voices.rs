//! Voice settings panel

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use drumgrid::Voice;

use super::Screen;

pub fn render_voices(frame: &mut Frame, area: Rect, screen: &Screen) {
    let block = Block::default().title(" Voices ").borders(Borders::ALL);

    let lines: Vec<Line> = Voice::ALL
        .iter()
        .zip(screen.settings)
        .enumerate()
        .map(|(row, (voice, s))| {
            let marker = if screen.cursor.row == row { "▸ " } else { "  " };
            Line::from(vec![
                Span::styled(format!("{marker}{:<8}", voice.label()), Style::default().fg(Color::White)),
                Span::styled(format!("{:<11}", s.timbre), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:>6.0} Hz  ", s.pitch), Style::default().fg(Color::Green)),
                Span::styled(
                    format!("vol {:>3.0}%  ", s.volume * 100.0),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    format!("{:>4.0} ms", s.duration * 1000.0),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
