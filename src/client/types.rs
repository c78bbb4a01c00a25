//! Type definitions for the recipe API.
//!
//! This module contains the data structures exchanged with the REST API:
//! authentication payloads, recipes with their ingredient lists, the
//! ingredient catalog, and the user profile.
//!
//! ## Key Types
//!
//! - [`AuthPayload`] - login/register response carrying the bearer token
//! - [`Recipe`] - recipe data with ingredients and metadata
//! - [`CreateRecipeRequest`] - new-recipe payload with client-side validation
//! - [`UserProfile`] - the authenticated user's account data
//!
//! ## API Compatibility
//!
//! List endpoints are inconsistent between server versions: some return a
//! bare JSON array, others wrap it in `{"recipes": [...]}` or
//! `{"ingredients": [...]}`. The untagged [`RecipeList`] and
//! [`IngredientList`] wrappers accept both shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Authentication response from `/auth/login` and `/auth/register`.
///
/// A 2xx response without a `token` is treated as a logical failure by the
/// session store; `error` carries the server's message when it sends one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Opaque bearer token. Never decoded client-side.
    #[serde(default)]
    pub token: Option<String>,
    /// Identifier of the authenticated user, from the response body only.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Server-provided failure message, if any.
    #[serde(default)]
    pub error: Option<String>,
}

/// Login request payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A recipe as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: i64,
    /// Recipe name/title
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Total cooking time in minutes
    #[serde(default)]
    pub cooking_time: Option<i32>,
    /// Difficulty rating, 1 (easiest) to 5
    #[serde(default)]
    pub difficulty: Option<i32>,
    /// Ingredients used by this recipe
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Identifier of the creating user
    #[serde(default)]
    pub author_id: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An entry in the ingredient catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a recipe.
///
/// Mirrors the create-recipe form: every field is required, the selected
/// ingredients are sent as catalog ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub name: String,
    pub description: String,
    /// Minutes; must be a positive number
    pub cooking_time: i32,
    /// 1 to 5
    pub difficulty: i32,
    /// Ids from the ingredient catalog; at least one
    pub ingredient_ids: Vec<i64>,
}

impl CreateRecipeRequest {
    /// The pre-request checks the create-recipe form performs. Rejected
    /// requests never reach the network.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ApiError::Validation(
                "name and description are required".to_string(),
            ));
        }
        if self.cooking_time <= 0 {
            return Err(ApiError::Validation(
                "cooking time must be a positive number of minutes".to_string(),
            ));
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(ApiError::Validation(
                "difficulty must be between 1 and 5".to_string(),
            ));
        }
        if self.ingredient_ids.is_empty() {
            return Err(ApiError::Validation(
                "select at least one ingredient".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload for updating the profile; omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.is_none() && self.email.is_none() && self.password.is_none() {
            return Err(ApiError::Validation("nothing to update".to_string()));
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ApiError::Validation("name cannot be empty".to_string()));
        }
        if matches!(&self.email, Some(email) if email.trim().is_empty()) {
            return Err(ApiError::Validation("email cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Recipe list response; accepts a bare array or a wrapped object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeList {
    Plain(Vec<Recipe>),
    Wrapped { recipes: Vec<Recipe> },
}

impl RecipeList {
    pub fn into_vec(self) -> Vec<Recipe> {
        match self {
            RecipeList::Plain(recipes) => recipes,
            RecipeList::Wrapped { recipes } => recipes,
        }
    }
}

/// Ingredient list response; accepts a bare array or a wrapped object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IngredientList {
    Plain(Vec<Ingredient>),
    Wrapped { ingredients: Vec<Ingredient> },
}

impl IngredientList {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            IngredientList::Plain(ingredients) => ingredients,
            IngredientList::Wrapped { ingredients } => ingredients,
        }
    }
}
