//! Async request worker for non-blocking backend calls.
//!
//! Every backend call (session check, history fetch, upload) runs as its
//! own tokio task; completions are delivered through one channel that the
//! TUI main loop drains each iteration, so outcomes apply to state in a
//! single thread and in arrival order.
//!
//! Session checks and uploads carry the generation number their callers
//! issued; the application layer uses it to discard completions of
//! superseded attempts. Upload tasks additionally return a join handle so
//! the caller can abort them on page unmount.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::application::UploadTicket;
use crate::domain::{Modality, ScanRecord, ScanResult, ScanUpload, Session, MAX_UPLOAD_BYTES};
use crate::ports::{ApiError, ImagingApi};

/// Completion events from request tasks.
#[derive(Debug)]
pub enum ApiEvent {
    /// A session check finished.
    SessionChecked {
        generation: u64,
        result: Result<Session, ApiError>,
    },
    /// A history fetch finished.
    HistoryFetched(Result<Vec<ScanRecord>, ApiError>),
    /// An upload finished.
    UploadFinished {
        modality: Modality,
        generation: u64,
        result: Result<ScanResult, ApiError>,
    },
}

/// Spawns request tasks and funnels their completions to the UI loop.
pub struct RequestWorker {
    api: Arc<dyn ImagingApi>,
    runtime: Handle,
    tx: Sender<ApiEvent>,
    rx: Receiver<ApiEvent>,
}

impl RequestWorker {
    #[must_use]
    pub fn new(api: Arc<dyn ImagingApi>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            runtime,
            tx,
            rx,
        }
    }

    /// Take the next completion event, if one has arrived (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<ApiEvent> {
        self.rx.try_recv().ok()
    }

    /// Check the session in the background.
    pub fn spawn_session_check(&self, generation: u64) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.check_session().await;
            let _ = tx.send(ApiEvent::SessionChecked { generation, result });
        });
    }

    /// Fetch the scan history in the background.
    pub fn spawn_history_fetch(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.fetch_history().await;
            let _ = tx.send(ApiEvent::HistoryFetched(result));
        });
    }

    /// Read the ticket's file and upload it in the background.
    ///
    /// The returned handle aborts the request; an aborted task sends no
    /// completion event.
    pub fn spawn_upload(&self, ticket: UploadTicket) -> JoinHandle<()> {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = read_and_upload(api, &ticket).await;
            let _ = tx.send(ApiEvent::UploadFinished {
                modality: ticket.modality,
                generation: ticket.generation,
                result,
            });
        })
    }
}

async fn read_and_upload(
    api: Arc<dyn ImagingApi>,
    ticket: &UploadTicket,
) -> Result<ScanResult, ApiError> {
    let bytes = tokio::fs::read(&ticket.path)
        .await
        .map_err(|e| ApiError::FileRead {
            path: ticket.path.display().to_string(),
            source: e,
        })?;

    // The size cap applies to the bytes actually read, not just to the
    // metadata the picker saw.
    if bytes.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(ApiError::InvalidUpload(format!(
            "File exceeds the {} MB upload limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let file_name = ticket
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("scan")
        .to_string();

    api.upload_scan(ticket.modality, ScanUpload::new(file_name, bytes))
        .await
}
