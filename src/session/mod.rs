//! # Session state
//!
//! The authentication state holder for the app: who is logged in, whether the
//! startup check has finished, and the operations that change it.
//!
//! ## Modules
//!
//! - [`state`] - the snapshot type, status derivation, and storage keys
//! - [`store`] - the store itself plus the shared handle the pipeline uses
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipebook_client::session::{SessionHandle, SessionStore};
//! use recipebook_client::client::RecipeClient;
//! use recipebook_client::navigator::NullNavigator;
//! use recipebook_client::storage::MemoryStorage;
//!
//! # async fn example() -> Result<(), recipebook_client::ApiError> {
//! let session = SessionHandle::new(Arc::new(MemoryStorage::new()));
//! let client = RecipeClient::new(
//!     "http://localhost:3000/api".to_string(),
//!     session.clone(),
//!     Arc::new(NullNavigator),
//! );
//! let store = SessionStore::new(session, client);
//!
//! store.bootstrap();
//! store.login("cook@example.com", "secret").await?;
//! assert!(store.snapshot().is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod state;
pub mod store;

pub use state::{SessionSnapshot, SessionStatus, TOKEN_KEY, USER_ID_KEY};
pub use store::{SessionHandle, SessionStore};
