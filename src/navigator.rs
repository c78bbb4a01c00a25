//! Navigation boundary.
//!
//! The pipeline needs exactly one capability from the host: forcing top-level
//! navigation to the login entry point after a server-signaled authorization
//! failure. It also needs to know where the user currently is, so it can skip
//! the redirect when they are already on an unauthenticated entry point and
//! avoid a redirect loop.

/// Path of the login entry point; forced-logout redirects land here.
pub const LOGIN_PATH: &str = "/login";

/// Path of the registration entry point; also exempt from the redirect.
pub const REGISTER_PATH: &str = "/register";

/// Host navigation capability, injected into the request pipeline.
pub trait Navigator: Send + Sync {
    /// The current top-level location path, e.g. `/recipes/42`.
    fn current_path(&self) -> String;

    /// Force top-level navigation to `path`.
    fn redirect_to(&self, path: &str);
}

/// True when `path` is an entry point reachable without a credential.
pub fn is_auth_entry_point(path: &str) -> bool {
    path == LOGIN_PATH || path == REGISTER_PATH
}

/// Navigator for hosts without a navigation surface (the smoke binary).
///
/// Reports the root path and logs redirects instead of performing them.
#[derive(Default)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn current_path(&self) -> String {
        "/".to_string()
    }

    fn redirect_to(&self, path: &str) {
        tracing::warn!("session invalidated; host would navigate to {}", path);
    }
}
