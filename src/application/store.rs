//! Central state store: session, per-modality scan state, history.
//!
//! Session and history are process-wide shared state; each modality owns an
//! independent scan slice. All mutation goes through [`Store::dispatch`] with
//! a typed [`Action`], and reads go through accessors, so every transition
//! has one auditable entry point and no view can poke state directly.

use std::time::Instant;

use crate::domain::{HistorySummary, Modality, ScanRecord, ScanResult, Session, User};

/// Lifecycle of one modality's upload, from file pick to rendered outcome.
///
/// `Succeeded` carries the result and nothing else; `Failed` carries only a
/// message. A slice can never hold both a result and an error.
#[derive(Debug, Clone)]
pub enum ScanState {
    /// No upload in flight, nothing to show.
    Idle,
    /// Upload in flight since the recorded instant.
    Scanning { since: Instant },
    /// Upload resolved with a prediction.
    Succeeded(ScanResult),
    /// Upload rejected; the message is fit for the inline banner.
    Failed(String),
}

impl ScanState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning { .. })
    }

    /// The completed result, if the last upload succeeded.
    #[must_use]
    pub fn result(&self) -> Option<&ScanResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// The banner message, if the last upload failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// How long the in-flight upload has been running.
    #[must_use]
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        match self {
            Self::Scanning { since } => Some(since.elapsed()),
            _ => None,
        }
    }
}

/// Authenticated-user slice. `loading` is true from the moment a session
/// check is issued until it resolves; the previous user is kept visible
/// while a re-check is pending.
#[derive(Debug, Clone)]
pub struct SessionState {
    user: Option<User>,
    loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Scan-history slice, most recent first. Consumed for dashboard stats;
/// never mutated by the upload pages themselves.
#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    scans: Vec<ScanRecord>,
    loading: bool,
}

impl HistoryState {
    #[must_use]
    pub fn scans(&self) -> &[ScanRecord] {
        &self.scans
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Aggregate statistics for the dashboard panels.
    #[must_use]
    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_records(&self.scans)
    }
}

/// State transition, applied by [`Store::dispatch`].
#[derive(Debug, Clone)]
pub enum Action {
    /// A session check was issued; mark the session slice pending.
    SessionChecking,
    /// A session check resolved (with or without a user).
    SessionResolved(Session),
    /// An upload started for the given modality.
    ScanStarted(Modality),
    /// An upload resolved with a prediction.
    ScanSucceeded(Modality, ScanResult),
    /// An upload failed; the message is shown in the banner.
    ScanFailed(Modality, String),
    /// Reset one modality's slice to `Idle`, discarding result or error.
    ScanCleared(Modality),
    /// A history fetch was issued.
    HistoryFetching,
    /// A history fetch resolved.
    HistoryFetched(Vec<ScanRecord>),
    /// A history fetch failed; stale entries stay visible.
    HistoryFailed,
}

/// The process-wide store.
pub struct Store {
    session: SessionState,
    mammogram: ScanState,
    ultrasound: ScanState,
    history: HistoryState,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Fresh store: session pending (checked on first mount), both scan
    /// slices idle, history empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: SessionState {
                user: None,
                loading: true,
            },
            mammogram: ScanState::Idle,
            ultrasound: ScanState::Idle,
            history: HistoryState::default(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    #[must_use]
    pub fn scan(&self, modality: Modality) -> &ScanState {
        match modality {
            Modality::Mammogram => &self.mammogram,
            Modality::Ultrasound => &self.ultrasound,
        }
    }

    fn scan_mut(&mut self, modality: Modality) -> &mut ScanState {
        match modality {
            Modality::Mammogram => &mut self.mammogram,
            Modality::Ultrasound => &mut self.ultrasound,
        }
    }

    /// Whether the dashboard should still show its loading screen: the
    /// session check is pending, or a signed-in user's first history page
    /// has not arrived yet.
    #[must_use]
    pub fn dashboard_loading(&self) -> bool {
        self.session.loading
            || (self.session.user.is_some()
                && self.history.loading
                && self.history.scans.is_empty())
    }

    /// Apply one state transition.
    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::SessionChecking => {
                self.session.loading = true;
            }
            Action::SessionResolved(session) => {
                self.session.user = session.user;
                self.session.loading = false;
            }
            Action::ScanStarted(modality) => {
                *self.scan_mut(modality) = ScanState::Scanning {
                    since: Instant::now(),
                };
            }
            Action::ScanSucceeded(modality, result) => {
                *self.scan_mut(modality) = ScanState::Succeeded(result);
            }
            Action::ScanFailed(modality, message) => {
                *self.scan_mut(modality) = ScanState::Failed(message);
            }
            Action::ScanCleared(modality) => {
                *self.scan_mut(modality) = ScanState::Idle;
            }
            Action::HistoryFetching => {
                self.history.loading = true;
            }
            Action::HistoryFetched(scans) => {
                self.history.scans = scans;
                self.history.loading = false;
            }
            Action::HistoryFailed => {
                self.history.loading = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> ScanResult {
        ScanResult {
            prediction: "malignant".to_string(),
            confidence: 0.92,
            image_url: "/img/1.png".to_string(),
            mask_image: None,
        }
    }

    fn sample_record() -> ScanRecord {
        ScanRecord {
            id: Some("scan-1".to_string()),
            modality: Some(Modality::Mammogram),
            created_at: None,
            result: sample_result(),
        }
    }

    #[test]
    fn test_new_store_is_pending_session_and_idle_scans() {
        let store = Store::new();
        assert!(store.session().is_loading());
        assert!(store.session().user().is_none());
        assert!(store.scan(Modality::Mammogram).is_idle());
        assert!(store.scan(Modality::Ultrasound).is_idle());
        assert!(store.history().scans().is_empty());
    }

    #[test]
    fn test_success_sets_result_and_no_error() {
        let mut store = Store::new();
        store.dispatch(Action::ScanStarted(Modality::Mammogram));
        assert!(store.scan(Modality::Mammogram).is_scanning());

        store.dispatch(Action::ScanSucceeded(Modality::Mammogram, sample_result()));
        let state = store.scan(Modality::Mammogram);
        assert!(state.result().is_some());
        assert!(state.error().is_none());
        assert!(!state.is_scanning());
    }

    #[test]
    fn test_failure_sets_error_and_no_result() {
        let mut store = Store::new();
        store.dispatch(Action::ScanStarted(Modality::Ultrasound));
        store.dispatch(Action::ScanFailed(
            Modality::Ultrasound,
            "network error".to_string(),
        ));
        let state = store.scan(Modality::Ultrasound);
        assert_eq!(state.error(), Some("network error"));
        assert!(state.result().is_none());
        assert!(!state.is_scanning());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = Store::new();
        store.dispatch(Action::ScanSucceeded(Modality::Mammogram, sample_result()));
        store.dispatch(Action::ScanCleared(Modality::Mammogram));
        assert!(store.scan(Modality::Mammogram).is_idle());
        store.dispatch(Action::ScanCleared(Modality::Mammogram));
        assert!(store.scan(Modality::Mammogram).is_idle());
    }

    #[test]
    fn test_modalities_have_independent_slices() {
        let mut store = Store::new();
        store.dispatch(Action::ScanStarted(Modality::Mammogram));
        assert!(store.scan(Modality::Mammogram).is_scanning());
        assert!(store.scan(Modality::Ultrasound).is_idle());
    }

    #[test]
    fn test_session_resolution_clears_loading() {
        let mut store = Store::new();
        store.dispatch(Action::SessionResolved(Session::signed_in(
            "a@clinic.org",
        )));
        assert!(!store.session().is_loading());
        assert_eq!(store.session().user().map(|u| u.email.as_str()), Some("a@clinic.org"));

        store.dispatch(Action::SessionChecking);
        assert!(store.session().is_loading());
        // The previous user stays visible while the re-check is pending.
        assert!(store.session().user().is_some());
    }

    #[test]
    fn test_history_failure_keeps_stale_entries() {
        let mut store = Store::new();
        store.dispatch(Action::HistoryFetched(vec![sample_record()]));
        assert_eq!(store.history().scans().len(), 1);

        store.dispatch(Action::HistoryFetching);
        store.dispatch(Action::HistoryFailed);
        assert_eq!(store.history().scans().len(), 1);
        assert!(!store.history().is_loading());
    }

    #[test]
    fn test_dashboard_loading_condition() {
        let mut store = Store::new();
        // Session check pending.
        assert!(store.dashboard_loading());

        // Signed out, nothing to wait for.
        store.dispatch(Action::SessionResolved(Session::signed_out()));
        assert!(!store.dashboard_loading());

        // Signed in, first history fetch pending.
        store.dispatch(Action::SessionResolved(Session::signed_in("a@b.org")));
        store.dispatch(Action::HistoryFetching);
        assert!(store.dashboard_loading());

        // A refresh with entries already on screen does not re-blank the page.
        store.dispatch(Action::HistoryFetched(vec![sample_record()]));
        store.dispatch(Action::HistoryFetching);
        assert!(!store.dashboard_loading());
    }
}
