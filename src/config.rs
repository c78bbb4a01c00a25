//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;

/// Settings the embedding host supplies, all overridable via environment
/// variables with the same defaults the development server uses.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recipe API, e.g. `http://localhost:3000/api`.
    pub base_url: String,
    /// Where the file-backed session storage lives.
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let base_url = env::var("RECIPEBOOK_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api".to_string());

        let session_file = env::var("RECIPEBOOK_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".recipebook-session.json"));

        Self {
            base_url,
            session_file,
        }
    }
}
