//! Imaging API port: Trait for the backend operations the client consumes.
//!
//! Following Hexagonal Architecture, this trait is the boundary between the
//! application and the remote inference service. The TUI never talks HTTP
//! directly; it goes through this port, which also makes the workflow and
//! worker layers testable against a scripted fake.

use crate::domain::{Modality, ScanRecord, ScanResult, ScanUpload, Session};

/// Error type for API operations.
///
/// Every variant renders to a message fit for the inline error banner;
/// transport details stay out of the UI and go to the log instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Could not reach the imaging service: {0}")]
    Transport(String),

    #[error("Not signed in")]
    Unauthorized,

    #[error("The imaging service rejected the request: {message}")]
    Rejected { status: u16, message: String },

    #[error("The imaging service failed (HTTP {status}), please try again")]
    Server { status: u16 },

    #[error("Unexpected response from the imaging service: {0}")]
    Decode(String),

    #[error("Could not read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    InvalidUpload(String),
}

/// Trait for the backend imaging API.
///
/// All operations are asynchronous network calls; implementations must be
/// cheap to share across request tasks.
#[async_trait::async_trait]
pub trait ImagingApi: Send + Sync {
    /// Check whether an authenticated session exists.
    ///
    /// Idempotent and safe to call on every route mount. A definitive
    /// "not signed in" response resolves to `Session { user: None }`, not
    /// to an error; errors mean the check itself could not complete.
    ///
    /// # Errors
    /// Returns `ApiError::Transport`/`Server`/`Decode` if the check fails.
    async fn check_session(&self) -> Result<Session, ApiError>;

    /// Fetch the user's scan history, most recent first.
    ///
    /// Requires an authenticated session.
    ///
    /// # Errors
    /// Returns `ApiError::Unauthorized` if the session is missing or expired.
    async fn fetch_history(&self) -> Result<Vec<ScanRecord>, ApiError>;

    /// Upload one image for inference on the given modality's endpoint.
    ///
    /// # Errors
    /// Returns an error if the transport fails or the backend rejects the
    /// image; the caller converts it into workflow state.
    async fn upload_scan(
        &self,
        modality: Modality,
        upload: ScanUpload,
    ) -> Result<ScanResult, ApiError>;
}
