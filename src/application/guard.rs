//! Session guard: gates every route behind an authenticated session.
//!
//! Each page mount issues exactly one session check. While the check is
//! pending the route renders only a loading indicator; once resolved, a
//! missing user redirects to the login route and a present user unlocks
//! the page content.
//!
//! A session check that fails outright (service unreachable, malformed
//! response) is treated the same as "not signed in": the user is redirected,
//! never shown a network-error state on this path. The distinction is kept
//! in the log only.

use crate::application::{Action, Store};
use crate::domain::Session;

/// What the guard allows the current route to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Session check pending; render the loading indicator only.
    Checking,
    /// No authenticated user; redirect to login, render nothing.
    SignedOut,
    /// Authenticated; render page content.
    SignedIn,
}

/// Issues session checks and applies their outcomes.
///
/// Checks are numbered so that when navigation outruns the network, only
/// the most recently issued check settles the session slice.
pub struct SessionGuard {
    generation: u64,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self { generation: 0 }
    }

    /// Record that a session check was issued for the current mount.
    ///
    /// Returns the check's generation, to be echoed by its completion.
    pub fn begin(&mut self, store: &mut Store) -> u64 {
        self.generation += 1;
        store.dispatch(Action::SessionChecking);
        tracing::debug!(generation = self.generation, "session check issued");
        self.generation
    }

    /// Apply a resolved session check. Stale checks are discarded.
    pub fn resolve(&mut self, store: &mut Store, generation: u64, session: Session) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale session check"
            );
            return false;
        }
        tracing::info!(signed_in = session.user.is_some(), "session resolved");
        store.dispatch(Action::SessionResolved(session));
        true
    }

    /// Apply a failed session check: collapse to "not signed in".
    pub fn resolve_failure(&mut self, store: &mut Store, generation: u64, reason: &str) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale session failure"
            );
            return false;
        }
        tracing::warn!(%reason, "session check failed, treating as signed out");
        store.dispatch(Action::SessionResolved(Session::signed_out()));
        true
    }

    /// Read the gate decision for the current session slice.
    #[must_use]
    pub fn gate(store: &Store) -> Gate {
        let session = store.session();
        if session.is_loading() {
            Gate::Checking
        } else if session.user().is_some() {
            Gate::SignedIn
        } else {
            Gate::SignedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_checking_while_pending() {
        let store = Store::new();
        assert_eq!(SessionGuard::gate(&store), Gate::Checking);
    }

    #[test]
    fn test_resolve_signed_in_unlocks_content() {
        let mut store = Store::new();
        let mut guard = SessionGuard::new();

        let generation = guard.begin(&mut store);
        assert_eq!(SessionGuard::gate(&store), Gate::Checking);

        assert!(guard.resolve(&mut store, generation, Session::signed_in("a@clinic.org")));
        assert_eq!(SessionGuard::gate(&store), Gate::SignedIn);
    }

    #[test]
    fn test_resolve_signed_out_redirects() {
        let mut store = Store::new();
        let mut guard = SessionGuard::new();

        let generation = guard.begin(&mut store);
        assert!(guard.resolve(&mut store, generation, Session::signed_out()));
        assert_eq!(SessionGuard::gate(&store), Gate::SignedOut);
    }

    #[test]
    fn test_failure_collapses_to_signed_out() {
        let mut store = Store::new();
        let mut guard = SessionGuard::new();

        let generation = guard.begin(&mut store);
        assert!(guard.resolve_failure(&mut store, generation, "connection refused"));
        assert_eq!(SessionGuard::gate(&store), Gate::SignedOut);
    }

    #[test]
    fn test_stale_check_is_discarded() {
        let mut store = Store::new();
        let mut guard = SessionGuard::new();

        let first = guard.begin(&mut store);
        let second = guard.begin(&mut store);

        // The older check resolving must not settle the slice.
        assert!(!guard.resolve(&mut store, first, Session::signed_in("old@clinic.org")));
        assert_eq!(SessionGuard::gate(&store), Gate::Checking);

        assert!(guard.resolve(&mut store, second, Session::signed_out()));
        assert_eq!(SessionGuard::gate(&store), Gate::SignedOut);
    }
}
