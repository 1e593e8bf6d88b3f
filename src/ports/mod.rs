//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (the imaging backend).

mod api;

pub use api::{ApiError, ImagingApi};
