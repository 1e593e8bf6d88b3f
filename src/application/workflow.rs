//! Scan workflow controller: the per-modality upload state machine.
//!
//! Drives one modality's slice through
//! `Idle -> Scanning -> Succeeded | Failed -> Idle`:
//! - `begin` validates the picked file and opens an upload attempt,
//! - `complete` / `fail` apply a finished attempt to the store,
//! - `reset` returns to `Idle` from any state.
//!
//! # Re-entrancy policy
//!
//! Exactly one upload may be in flight per controller. A file selected
//! while `Scanning` is ignored (not queued, not cancelling the in-flight
//! attempt); the user retries after the current upload resolves.
//!
//! # Stale completions
//!
//! Every attempt carries a generation number. `reset` (also issued on page
//! mount and unmount) advances the generation, so a completion that arrives
//! for a superseded attempt is discarded instead of resurrecting a view the
//! user already left.

use std::path::{Path, PathBuf};

use crate::application::{Action, Store};
use crate::domain::{
    is_supported_image, Modality, ScanResult, MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS,
};

/// A validated upload attempt, ready to be handed to the request worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub modality: Modality,
    pub generation: u64,
    pub path: PathBuf,
}

/// What happened when a finished upload was applied to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Outcome applied to the store.
    Applied,
    /// Outcome applied, and a history refresh should be issued for the
    /// signed-in user.
    AppliedNotify,
    /// Outcome belonged to a superseded attempt and was discarded.
    Stale,
}

/// Controller for one modality's upload lifecycle.
pub struct ScanWorkflow {
    modality: Modality,
    generation: u64,
}

impl ScanWorkflow {
    #[must_use]
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            generation: 0,
        }
    }

    #[must_use]
    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// Start an upload for the picked file.
    ///
    /// Returns a ticket for the request worker, or `None` when the
    /// selection was ignored (upload already in flight) or failed local
    /// validation (the failure is applied to the store directly, without
    /// touching the network).
    pub fn begin(&mut self, store: &mut Store, path: &Path) -> Option<UploadTicket> {
        if store.scan(self.modality).is_scanning() {
            tracing::debug!(modality = %self.modality, "upload in flight, ignoring selection");
            return None;
        }

        if let Err(message) = validate_upload(path, MAX_UPLOAD_BYTES) {
            tracing::info!(modality = %self.modality, %message, "rejected file locally");
            store.dispatch(Action::ScanFailed(self.modality, message));
            return None;
        }

        self.generation += 1;
        store.dispatch(Action::ScanStarted(self.modality));
        tracing::info!(
            modality = %self.modality,
            generation = self.generation,
            "upload started"
        );
        Some(UploadTicket {
            modality: self.modality,
            generation: self.generation,
            path: path.to_path_buf(),
        })
    }

    /// Apply a successful upload.
    ///
    /// `AppliedNotify` asks the caller to issue a history refresh; it is
    /// returned only when a user is present, and strictly after the result
    /// has been applied to the store.
    pub fn complete(
        &mut self,
        store: &mut Store,
        generation: u64,
        result: ScanResult,
    ) -> Resolution {
        if generation != self.generation {
            tracing::debug!(
                modality = %self.modality,
                generation,
                current = self.generation,
                "discarding stale upload result"
            );
            return Resolution::Stale;
        }

        tracing::info!(
            modality = %self.modality,
            prediction = %result.prediction,
            confidence = result.confidence,
            "upload succeeded"
        );
        store.dispatch(Action::ScanSucceeded(self.modality, result));

        if store.session().user().is_some() {
            Resolution::AppliedNotify
        } else {
            Resolution::Applied
        }
    }

    /// Apply a failed upload. The message lands in the inline banner.
    pub fn fail(&mut self, store: &mut Store, generation: u64, message: String) -> Resolution {
        if generation != self.generation {
            tracing::debug!(
                modality = %self.modality,
                generation,
                current = self.generation,
                "discarding stale upload failure"
            );
            return Resolution::Stale;
        }

        tracing::warn!(modality = %self.modality, %message, "upload failed");
        store.dispatch(Action::ScanFailed(self.modality, message));
        Resolution::Applied
    }

    /// Return to `Idle`, discarding any result or error.
    ///
    /// Also issued on page mount and unmount, so a revisit never flashes a
    /// stale result. Advances the generation, which invalidates any
    /// still-running attempt.
    pub fn reset(&mut self, store: &mut Store) {
        self.generation += 1;
        store.dispatch(Action::ScanCleared(self.modality));
    }
}

/// Check a picked file before any network work: extension, existence, size.
fn validate_upload(path: &Path, max_bytes: u64) -> Result<(), String> {
    if !is_supported_image(path) {
        return Err(format!(
            "Unsupported file type: use one of {}",
            SUPPORTED_EXTENSIONS.join(", ")
        ));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| format!("Could not read {}: {e}", path.display()))?;
    if !metadata.is_file() {
        return Err(format!("{} is not a file", path.display()));
    }
    if metadata.len() > max_bytes {
        return Err(format!(
            "File exceeds the {} MB upload limit",
            max_bytes / (1024 * 1024)
        ));
    }
    Ok(())
}
