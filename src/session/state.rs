//! Session state snapshot and the storage keys it is persisted under.

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the user identifier.
pub const USER_ID_KEY: &str = "userId";

/// Where the session currently stands.
///
/// `Unknown` only exists before the one-time startup rehydration has
/// completed; dependent UI should treat it as "not ready yet" rather than
/// rendering a logged-out view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unknown,
    Anonymous,
    Authenticated,
}

/// Read-only view of the session state handed to subscribers and readers.
///
/// Invariant: `user_id` is `Some` only when `token` is; there is never an
/// orphaned identity without a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user_id: Option<String>,
    /// True until startup rehydration has completed.
    pub loading: bool,
}

impl SessionSnapshot {
    pub(crate) fn initial() -> Self {
        Self {
            token: None,
            user_id: None,
            loading: true,
        }
    }

    /// Strict presence-check of the token; never derived any other way.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.loading {
            SessionStatus::Unknown
        } else if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}
