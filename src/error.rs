//! Error taxonomy for the client core.
//!
//! Every failure surfaced by this crate is one of these variants, so call sites
//! can distinguish the cases that matter to the UI:
//!
//! - [`ApiError::Validation`] - rejected client-side, no request was sent
//! - [`ApiError::Auth`] - the server rejected the submitted credentials
//! - [`ApiError::Unauthorized`] - the held credential was rejected; the session
//!   has already been cleared and a redirect issued by the time this is seen
//! - [`ApiError::Transport`] - network or decoding failure, nothing was changed
//!
//! The core never retries; every failure is returned to the call site carrying
//! a human-readable message, server-provided when one is available.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected before any network call (missing field, bad numeric input).
    #[error("{0}")]
    Validation(String),

    /// The server rejected the submitted credentials on login or register.
    #[error("{0}")]
    Auth(String),

    /// The held credential was rejected (HTTP 401/403) on an authenticated
    /// call. The forced logout side effect has already run when this is
    /// returned.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested resource does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success response from the server.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Network failure or an unreadable response body.
    #[error("{0}")]
    Transport(String),

    /// The request was cancelled through its cancellation token.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True for the authorization-failure case that forces a logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
