//! # Recipebook client core
//!
//! This library implements the client-side core of a recipe-management app:
//! the session store and the authorized request pipeline, plus the typed API
//! client the app's views call through it. It consists of two main components:
//!
//! ## Session module
//!
//! The [`session`] module owns authentication state: startup rehydration from
//! durable storage, `login`/`register`/`logout`, and synchronous subscriber
//! notification for dependent UI.
//!
//! ## Client module
//!
//! The [`client`] module dispatches every outbound request through a single
//! pipeline that attaches the bearer credential and reacts to server-signaled
//! authorization failures by clearing the session and redirecting to the
//! login entry point.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipebook_client::{RecipeClient, SessionHandle, SessionStore};
//! use recipebook_client::navigator::NullNavigator;
//! use recipebook_client::storage::FileStorage;
//!
//! # async fn example() -> Result<(), recipebook_client::ApiError> {
//! let storage = Arc::new(FileStorage::open(".recipebook-session.json"));
//! let session = SessionHandle::new(storage);
//! let client = RecipeClient::new(
//!     "http://localhost:3000/api".to_string(),
//!     session.clone(),
//!     Arc::new(NullNavigator),
//! );
//! let store = SessionStore::new(session, client.clone());
//!
//! store.bootstrap();
//! if !store.snapshot().is_authenticated() {
//!     store.login("cook@example.com", "secret").await?;
//! }
//! let recipes = client.list_recipes(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod navigator;
pub mod session;
pub mod storage;

pub use client::RecipeClient;
pub use error::ApiError;
pub use session::{SessionHandle, SessionSnapshot, SessionStatus, SessionStore};
