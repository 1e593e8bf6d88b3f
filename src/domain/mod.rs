//! Domain layer: Core business types and logic.
//!
//! Pure types only: no I/O, no HTTP, no terminal. Everything here is either
//! a wire shape shared with the backend or a derived display value.

mod history;
mod scan;
mod session;

pub use history::{HistorySummary, ScanRecord};
pub use scan::{
    is_supported_image, Modality, ScanResult, ScanUpload, Verdict, MAX_UPLOAD_BYTES,
    SUPPORTED_EXTENSIONS,
};
pub use session::{Session, User};
