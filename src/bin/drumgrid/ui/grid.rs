//! Step grid widget - one row per voice, cursor and playhead

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use drumgrid::{Voice, STEPS};

use super::Screen;

const LABEL_WIDTH: usize = 8;

pub fn render_grid(frame: &mut Frame, area: Rect, screen: &Screen) {
    let block = Block::default().title(" Pattern ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < (LABEL_WIDTH + STEPS * 3) as u16 {
        return;
    }

    let playhead = screen.view.playhead();
    let mut lines = Vec::with_capacity(Voice::ALL.len() + 1);

    // Step numbers, beats brighter
    let mut header = vec![Span::raw(" ".repeat(LABEL_WIDTH))];
    for step in 0..STEPS {
        let color = if playhead == Some(step) {
            Color::Yellow
        } else if step % 4 == 0 {
            Color::White
        } else {
            Color::DarkGray
        };
        header.push(Span::styled(format!("{:>2} ", step + 1), Style::default().fg(color)));
    }
    lines.push(Line::from(header));

    for (row, voice) in Voice::ALL.iter().enumerate() {
        let label_style = if screen.flashing[row] {
            Style::default().fg(Color::Black).bg(Color::Magenta)
        } else {
            Style::default().fg(Color::White)
        };
        let mut spans = vec![Span::styled(format!("{:<width$}", voice.label(), width = LABEL_WIDTH), label_style)];

        let steps = screen.view.pattern.row(*voice);
        for (step, &on) in steps.iter().enumerate() {
            let glyph = if on { " ■ " } else { " · " };
            let mut style = match (on, playhead == Some(step)) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Green),
                (false, true) => Style::default().fg(Color::Yellow),
                (false, false) if step % 4 == 0 => Style::default().fg(Color::Gray),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            if screen.cursor.row == row && screen.cursor.step == step {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(glyph, style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
