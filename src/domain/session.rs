//! Session and user types.
//!
//! The client never issues credentials itself; it only learns from the
//! backend whether an authenticated session exists.

use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier shown in the dashboard greeting.
    pub email: String,
}

/// Result of a session check.
///
/// `user` is `None` when no authenticated session exists. A `401` from the
/// backend resolves to this, not to an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    /// A session belonging to the given user.
    #[must_use]
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            user: Some(User {
                email: email.into(),
            }),
        }
    }

    /// A resolved session with no user.
    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None }
    }
}
