//! Application layer: Use cases and state orchestration.
//!
//! This module owns the session gate, the central store, and the per-page
//! upload workflow, all independent of the terminal frontend and of the
//! concrete API adapter.

mod guard;
mod store;
mod workflow;

pub use guard::{Gate, SessionGuard};
pub use store::{Action, HistoryState, ScanState, SessionState, Store};
pub use workflow::{Resolution, ScanWorkflow, UploadTicket};
