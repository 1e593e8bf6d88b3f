//! Result presenter: renders a completed prediction.
//!
//! Shows the prediction label, a confidence bar, and the analyzed image.
//! When the backend returned a segmentation mask, the mask is shown in
//! place of the original image, together with an explanatory caption.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Modality, ScanResult};
use crate::tui::styles::ImagingTheme;

/// Caption shown under ultrasound results that carry a mask.
const MASK_CAPTION: &str =
    "A segmentation mask has been generated highlighting potential abnormalities.";

/// Render the result card for a completed scan.
pub fn render_result(f: &mut Frame, area: Rect, modality: Modality, result: &ScanResult) {
    let block = Block::default()
        .title(Span::styled(" Analysis Result ", ImagingTheme::accent(modality)))
        .borders(Borders::ALL)
        .border_style(ImagingTheme::accent_border(modality));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Prediction
            Constraint::Length(3), // Confidence gauge
            Constraint::Min(0),    // Image, caption, hints
        ])
        .margin(1)
        .split(inner);

    let verdict = result.verdict();

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Prediction: ", ImagingTheme::text_secondary()),
            Span::styled(result.prediction.clone(), ImagingTheme::verdict(verdict)),
        ])),
        chunks[0],
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Confidence ", ImagingTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ImagingTheme::border()),
        )
        .gauge_style(ImagingTheme::confidence_gauge(verdict))
        .percent(result.confidence_percent() as u16)
        .label(format!("{:.1}%", result.confidence_percent()));
    f.render_widget(gauge, chunks[1]);

    let p = Paragraph::new(detail_lines(result)).wrap(Wrap { trim: true });
    f.render_widget(p, chunks[2]);
}

/// The text half of the card: image line, optional mask caption, key hints.
fn detail_lines(result: &ScanResult) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            if result.has_mask() { "Mask: " } else { "Image: " },
            ImagingTheme::text_secondary(),
        ),
        Span::styled(result.display_image().to_string(), ImagingTheme::text()),
    ])];

    if result.has_mask() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            MASK_CAPTION,
            ImagingTheme::info(),
        )]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter] ", ImagingTheme::key_hint()),
        Span::styled("Scan Another Image", ImagingTheme::key_desc()),
        Span::styled("   [Esc] ", ImagingTheme::key_hint()),
        Span::styled("Dashboard", ImagingTheme::key_desc()),
    ]));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn flatten_all(lines: &[Line]) -> String {
        lines.iter().map(flatten).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_plain_result_shows_image_url() {
        let result = ScanResult {
            prediction: "malignant".to_string(),
            confidence: 0.92,
            image_url: "/img/1.png".to_string(),
            mask_image: None,
        };

        let text = flatten_all(&detail_lines(&result));
        assert!(text.contains("Image: /img/1.png"));
        assert!(!text.contains(MASK_CAPTION));
    }

    #[test]
    fn test_mask_takes_precedence_and_adds_caption() {
        let result = ScanResult {
            prediction: "benign".to_string(),
            confidence: 0.81,
            image_url: "/img/2.png".to_string(),
            mask_image: Some("/img/2_mask.png".to_string()),
        };

        let text = flatten_all(&detail_lines(&result));
        assert!(text.contains("Mask: /img/2_mask.png"));
        assert!(!text.contains("/img/2.png"));
        assert!(text.contains(MASK_CAPTION));
    }

    #[test]
    fn test_reset_hint_is_offered() {
        let result = ScanResult {
            prediction: "benign".to_string(),
            confidence: 0.5,
            image_url: "/img/3.png".to_string(),
            mask_image: None,
        };

        let text = flatten_all(&detail_lines(&result));
        assert!(text.contains("Scan Another Image"));
    }
}
