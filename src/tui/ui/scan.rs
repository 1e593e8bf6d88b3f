//! Scan page: file picker, upload progress, result or error, per modality.
//!
//! The page renders whatever the modality's [`ScanState`] says:
//! - `Idle`: the file-path form,
//! - `Scanning`: an in-flight panel with elapsed time,
//! - `Succeeded`: the result card (see [`super::result`]),
//! - `Failed`: an error banner with the form below it, ready for retry.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::ScanState;
use crate::domain::{Modality, SUPPORTED_EXTENSIONS};
use crate::tui::styles::ImagingTheme;
use crate::tui::ui::spinner_frame;

/// Editable state of the file-path input.
#[derive(Debug, Default)]
pub struct FileInputState {
    input: String,
}

impl FileInputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.input
    }

    /// The entered path with surrounding whitespace and quote characters
    /// dropped (paths pasted from file managers often arrive quoted).
    #[must_use]
    pub fn path(&self) -> Option<std::path::PathBuf> {
        let trimmed = self.input.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.is_empty() {
            None
        } else {
            Some(std::path::PathBuf::from(trimmed))
        }
    }
}

/// Render one modality's scan page.
pub fn render_scan_page(
    f: &mut Frame,
    area: Rect,
    modality: Modality,
    scan: &ScanState,
    input: &FileInputState,
    tick: u64,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Page header
            Constraint::Min(0),    // Body
        ])
        .split(area);

    render_page_header(f, chunks[0], modality);

    match scan {
        ScanState::Idle => render_upload_form(f, chunks[1], modality, input, None),
        ScanState::Scanning { .. } => render_in_flight(f, chunks[1], modality, scan, tick),
        ScanState::Succeeded(result) => {
            super::result::render_result(f, chunks[1], modality, result);
        }
        ScanState::Failed(message) => {
            render_upload_form(f, chunks[1], modality, input, Some(message));
        }
    }
}

fn render_page_header(f: &mut Frame, area: Rect, modality: Modality) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ImagingTheme::text()),
        Span::styled(modality.title(), ImagingTheme::accent(modality)),
        Span::styled(" │ ", ImagingTheme::text_muted()),
        Span::styled(modality.description(), ImagingTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ImagingTheme::border()),
    );

    f.render_widget(header, area);
}

/// The form, with an error banner above it after a failed upload.
fn render_upload_form(
    f: &mut Frame,
    area: Rect,
    modality: Modality,
    input: &FileInputState,
    error: Option<&str>,
) {
    let constraints = if error.is_some() {
        vec![
            Constraint::Length(4), // Error banner
            Constraint::Length(3), // Path input
            Constraint::Min(0),    // Hints
        ]
    } else {
        vec![Constraint::Length(3), Constraint::Min(0)]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let mut idx = 0;
    if let Some(message) = error {
        let banner = Paragraph::new(Line::from(vec![Span::styled(
            message.to_string(),
            ImagingTheme::danger(),
        )]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Upload failed ", ImagingTheme::danger()))
                .borders(Borders::ALL)
                .border_style(ImagingTheme::danger()),
        );
        f.render_widget(banner, chunks[idx]);
        idx += 1;
    }

    let input_block = Block::default()
        .title(Span::styled(" Image file path ", ImagingTheme::accent_light(modality)))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::accent_border(modality));

    let input_line = Line::from(vec![
        Span::styled(input.value().to_string(), ImagingTheme::text()),
        Span::styled("█", ImagingTheme::accent_light(modality)),
    ]);
    f.render_widget(Paragraph::new(input_line).block(input_block), chunks[idx]);
    idx += 1;

    let hints = vec![
        Line::from(vec![Span::styled(
            format!("Supported formats: {}", SUPPORTED_EXTENSIONS.join(", ")),
            ImagingTheme::text_muted(),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter] ", ImagingTheme::key_hint()),
            Span::styled("Upload", ImagingTheme::key_desc()),
            Span::styled("   [Esc] ", ImagingTheme::key_hint()),
            Span::styled("Dashboard", ImagingTheme::key_desc()),
        ]),
    ];
    f.render_widget(Paragraph::new(hints), chunks[idx]);
}

fn render_in_flight(f: &mut Frame, area: Rect, modality: Modality, scan: &ScanState, tick: u64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let elapsed = scan.elapsed().map(|d| d.as_secs()).unwrap_or(0);

    let lines = vec![
        Line::from(vec![
            Span::styled(spinner_frame(tick), ImagingTheme::accent_light(modality)),
            Span::styled(" Analyzing scan", ImagingTheme::text()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("Running inference for {elapsed}s"),
            ImagingTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .title(Span::styled(" Upload in progress ", ImagingTheme::accent(modality)))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::accent_border(modality));

    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_editing() {
        let mut input = FileInputState::new();
        for c in "/tmp/a.png".chars() {
            input.input_char(c);
        }
        assert_eq!(input.value(), "/tmp/a.png");

        input.delete_char();
        assert_eq!(input.value(), "/tmp/a.pn");

        input.clear();
        assert_eq!(input.value(), "");
        assert!(input.path().is_none());
    }

    #[test]
    fn test_path_strips_quotes_and_whitespace() {
        let mut input = FileInputState::new();
        for c in "  \"/data/scan one.png\"  ".chars() {
            input.input_char(c);
        }
        let path = input.path().expect("path");
        assert_eq!(path, std::path::PathBuf::from("/data/scan one.png"));
    }
}
