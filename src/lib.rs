//! # Scanline
//!
//! Terminal client for an AI-assisted breast-imaging service.
//!
//! This crate provides:
//! - Session-gated routes (dashboard, mammogram, ultrasound, login)
//! - A per-modality upload workflow with inline error reporting
//! - A dashboard summarizing the signed-in user's scan history
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (users, modalities, scan results, history)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (HTTP API, log sanitization)
//! - `application`: Session gate, workflow state machine, central store
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Modality, ScanResult, User};

/// Result type for Scanline operations
pub type Result<T> = std::result::Result<T, ScanlineError>;

/// Main error type for Scanline.
///
/// Request failures never reach this type; they travel as
/// [`ports::ApiError`] completion events so each page can render its own
/// banner. What remains fallible at this level is startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScanlineError {
    #[error("Invalid configuration: {0}")]
    Config(String),
}
