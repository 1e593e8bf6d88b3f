//! Dashboard view: welcome header, history statistics, recent scans.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::HistoryState;
use crate::domain::{ScanRecord, User, Verdict};
use crate::tui::styles::ImagingTheme;

/// How many history entries the recent-scans panel lists.
const RECENT_LIMIT: usize = 10;

/// Render the dashboard for a signed-in user.
pub fn render_dashboard(f: &mut Frame, area: Rect, user: &User, history: &HistoryState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0], user);
    render_main_content(f, chunks[1], history);
}

fn render_header(f: &mut Frame, area: Rect, user: &User) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ImagingTheme::text()),
        Span::styled("Scanline", ImagingTheme::title()),
        Span::styled(" │ ", ImagingTheme::text_muted()),
        Span::styled(
            format!("Welcome back, {}", user.email),
            ImagingTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ImagingTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, history: &HistoryState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Stats panels
            Constraint::Percentage(60), // Recent scans
        ])
        .split(area);

    render_stats_panels(f, chunks[0], history);
    render_recent_scans(f, chunks[1], history);
}

fn render_stats_panels(f: &mut Frame, area: Rect, history: &HistoryState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Scan counts
            Constraint::Length(5), // Mean confidence
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let summary = history.summary();

    let mut count_lines = vec![
        Line::from(vec![
            Span::styled("  Total scans: ", ImagingTheme::text_secondary()),
            Span::styled(summary.total.to_string(), ImagingTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Mammograms: ", ImagingTheme::text_secondary()),
            Span::styled(summary.mammograms.to_string(), ImagingTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Ultrasounds: ", ImagingTheme::text_secondary()),
            Span::styled(summary.ultrasounds.to_string(), ImagingTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Findings: ", ImagingTheme::text_secondary()),
            Span::styled(
                summary.malignant.to_string(),
                ImagingTheme::verdict(Verdict::Malignant),
            ),
            Span::styled(" malignant / ", ImagingTheme::text_muted()),
            Span::styled(
                summary.benign.to_string(),
                ImagingTheme::verdict(Verdict::Benign),
            ),
            Span::styled(" benign", ImagingTheme::text_muted()),
        ]),
    ];
    if summary.masks > 0 {
        count_lines.push(Line::from(vec![
            Span::styled("  Masks generated: ", ImagingTheme::text_secondary()),
            Span::styled(summary.masks.to_string(), ImagingTheme::info()),
        ]));
    }

    let counts_block = Block::default()
        .title(Span::styled(" Scan History ", ImagingTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::border());

    f.render_widget(Paragraph::new(count_lines).block(counts_block), chunks[0]);

    // Mean confidence across all records.
    let confidence = summary.mean_confidence.unwrap_or(0.0).clamp(0.0, 1.0);
    let confidence_block = Block::default()
        .title(Span::styled(" Mean Confidence ", ImagingTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::border());

    let confidence_gauge = Gauge::default()
        .block(confidence_block)
        .gauge_style(ImagingTheme::info())
        .percent((confidence * 100.0) as u16)
        .label(match summary.mean_confidence {
            Some(value) => format!("{:.0}%", value * 100.0),
            None => "n/a".to_string(),
        });

    f.render_widget(confidence_gauge, chunks[1]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[M] ", ImagingTheme::key_hint()),
            Span::styled("Mammogram Analysis", ImagingTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[U] ", ImagingTheme::key_hint()),
            Span::styled("Ultrasound Analysis", ImagingTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[R] ", ImagingTheme::key_hint()),
            Span::styled("Refresh History", ImagingTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", ImagingTheme::key_hint()),
            Span::styled("Quit", ImagingTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", ImagingTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[2]);
}

fn render_recent_scans(f: &mut Frame, area: Rect, history: &HistoryState) {
    let title = if history.is_loading() {
        " Recent Scans (refreshing) "
    } else {
        " Recent Scans "
    };
    let block = Block::default()
        .title(Span::styled(title, ImagingTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::border());

    if history.scans().is_empty() {
        let empty = Paragraph::new(Line::from(vec![Span::styled(
            "No scans yet. Press [M] or [U] to analyze an image.",
            ImagingTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = history
        .scans()
        .iter()
        .take(RECENT_LIMIT)
        .map(record_line)
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn record_line(record: &ScanRecord) -> Line<'static> {
    let modality = record
        .modality
        .map(|m| m.label())
        .unwrap_or("Scan");
    let verdict = record.result.verdict();

    Line::from(vec![
        Span::styled(
            format!(" {} ", record.created_label()),
            ImagingTheme::text_muted(),
        ),
        Span::styled(format!("{modality:<11}"), ImagingTheme::text_secondary()),
        Span::styled(record.result.prediction.clone(), ImagingTheme::verdict(verdict)),
        Span::styled(
            format!("  {:.0}%", record.result.confidence_percent()),
            ImagingTheme::text(),
        ),
    ])
}
