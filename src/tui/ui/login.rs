//! Login screen: the redirect target for unauthenticated visitors.
//!
//! The client has no credential entry of its own; it authenticates with a
//! bearer token from the environment. This screen explains where the token
//! goes and offers a re-check of the session.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ImagingTheme;

pub fn render_login(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(9),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(chunks[1]);

    let lines = vec![
        Line::from(vec![Span::styled("Scanline", ImagingTheme::title())]),
        Line::from(vec![Span::styled(
            "Sign in required",
            ImagingTheme::subtitle(),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "No authenticated session was found.",
            ImagingTheme::text_secondary(),
        )]),
        Line::from(vec![Span::styled(
            "Set SCANLINE_API_TOKEN (or SCANLINE_API_TOKEN_FILE) and retry.",
            ImagingTheme::text_secondary(),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[R] ", ImagingTheme::key_hint()),
            Span::styled("Retry session check", ImagingTheme::key_desc()),
            Span::styled("   [Q] ", ImagingTheme::key_hint()),
            Span::styled("Quit", ImagingTheme::key_desc()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(ImagingTheme::border());

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(p, horizontal[1]);
}
