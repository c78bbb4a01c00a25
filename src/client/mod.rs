//! # Recipe API client
//!
//! This module provides the HTTP side of the core: the authorized request
//! pipeline and the typed endpoint client built on top of it.
//!
//! ## Modules
//!
//! - [`pipeline`] - credential attachment, 401/403 inspection, transport seam
//! - [`api`] - per-endpoint methods for auth, recipes, ingredients, profile
//! - [`types`] - type definitions for API requests and responses
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipebook_client::client::RecipeClient;
//! use recipebook_client::navigator::NullNavigator;
//! use recipebook_client::session::SessionHandle;
//! use recipebook_client::storage::MemoryStorage;
//!
//! # async fn example() -> Result<(), recipebook_client::ApiError> {
//! let session = SessionHandle::new(Arc::new(MemoryStorage::new()));
//! let client = RecipeClient::new(
//!     "http://localhost:3000/api".to_string(),
//!     session,
//!     Arc::new(NullNavigator),
//! );
//!
//! // Search for recipes
//! let recipes = client.list_recipes(Some("pasta")).await?;
//! println!("Found {} recipes", recipes.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod pipeline;
pub mod types;

pub use api::RecipeClient;
pub use pipeline::{ApiRequest, ApiResponse, HttpTransport, RequestPipeline, Transport};
pub use types::*;
