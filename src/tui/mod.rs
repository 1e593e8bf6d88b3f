//! Terminal user interface, built on Ratatui.
//!
//! Routes:
//! - Dashboard with history stats and recent scans
//! - Mammogram and ultrasound upload pages
//! - Login prompt when no session is present

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Route};
pub use styles::ImagingTheme;
pub use worker::{ApiEvent, RequestWorker};
