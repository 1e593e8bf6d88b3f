//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `http`: reqwest client for the imaging service REST API
//! - `sanitize`: PII filtering for logs

pub mod http;
pub mod sanitize;

pub use http::{ApiConfig, HttpApi};
