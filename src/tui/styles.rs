//! Imaging-themed color palette and styles.
//!
//! Dark slate base with one accent color per modality, mirroring the
//! service's web styling: rose for mammography, cyan for ultrasound.
//! Verdict colors follow clinical reading conventions (red for malignant
//! findings, green for benign).

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{Modality, Verdict};

/// Imaging theme color palette.
pub struct ImagingTheme;

impl ImagingTheme {
    // === Modality Accents ===

    /// Pink - mammography pages
    pub const MAMMOGRAM: Color = Color::Rgb(219, 39, 119); // #DB2777

    /// Lighter rose for mammography highlights
    pub const MAMMOGRAM_LIGHT: Color = Color::Rgb(251, 113, 133); // #FB7185

    /// Blue - ultrasound pages
    pub const ULTRASOUND: Color = Color::Rgb(37, 99, 235); // #2563EB

    /// Lighter cyan for ultrasound highlights
    pub const ULTRASOUND_LIGHT: Color = Color::Rgb(34, 211, 238); // #22D3EE

    // === Primary Colors ===

    /// Teal - app-level chrome (header, dashboard)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    // === Semantic Colors ===

    /// Emerald - success / benign findings
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber - warnings
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose - errors / malignant findings
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue - informational
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Background Colors ===

    /// Near-black slate
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    /// Primary text (near-white)
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    /// Secondary text (gray)
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    /// Light slate for borders
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for success messages
    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Style for warning messages
    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Style for danger/error messages
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for info messages
    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Strong accent for a modality's page chrome.
    #[must_use]
    pub fn accent(modality: Modality) -> Style {
        let color = match modality {
            Modality::Mammogram => Self::MAMMOGRAM,
            Modality::Ultrasound => Self::ULTRASOUND,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Light accent for a modality's highlights and hints.
    #[must_use]
    pub fn accent_light(modality: Modality) -> Style {
        let color = match modality {
            Modality::Mammogram => Self::MAMMOGRAM_LIGHT,
            Modality::Ultrasound => Self::ULTRASOUND_LIGHT,
        };
        Style::default().fg(color)
    }

    /// Border style for a modality's focused panels.
    #[must_use]
    pub fn accent_border(modality: Modality) -> Style {
        let color = match modality {
            Modality::Mammogram => Self::MAMMOGRAM_LIGHT,
            Modality::Ultrasound => Self::ULTRASOUND_LIGHT,
        };
        Style::default().fg(color)
    }

    /// Style for a prediction verdict.
    #[must_use]
    pub fn verdict(verdict: Verdict) -> Style {
        match verdict {
            Verdict::Malignant => Self::danger().add_modifier(Modifier::BOLD),
            Verdict::Benign => Self::success().add_modifier(Modifier::BOLD),
            Verdict::Other => Self::info().add_modifier(Modifier::BOLD),
        }
    }

    /// Gauge style for a result's confidence bar, colored by verdict.
    #[must_use]
    pub fn confidence_gauge(verdict: Verdict) -> Style {
        match verdict {
            Verdict::Malignant => Self::danger(),
            Verdict::Benign => Self::success(),
            Verdict::Other => Self::info(),
        }
    }
}
