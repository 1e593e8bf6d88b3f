//! UI module: View components for the TUI.

pub mod dashboard;
pub mod login;
pub mod result;
pub mod scan;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ImagingTheme;

/// Spinner frames for in-flight requests, advanced by the loop tick.
const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠦", "⠧", "⠇"];

#[must_use]
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

/// Full-area loading indicator, shown while the session gate is pending.
pub fn render_loader(f: &mut Frame, area: Rect, tick: u64, label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let line = Line::from(vec![
        Span::styled(spinner_frame(tick), ImagingTheme::subtitle()),
        Span::raw(" "),
        Span::styled(label.to_string(), ImagingTheme::text_secondary()),
    ]);

    let p = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(p, chunks[1]);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "Research use only. AI predictions do not replace professional radiological evaluation.",
        ImagingTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ImagingTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
