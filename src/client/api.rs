use std::sync::Arc;

use serde::Serialize;

use crate::client::pipeline::{ApiRequest, ApiResponse, HttpTransport, RequestPipeline, Transport};
use crate::client::types::*;
use crate::error::ApiError;
use crate::navigator::Navigator;
use crate::session::SessionHandle;

/// Typed client for the recipe API. Every call goes through the authorized
/// request pipeline; cloning is cheap and clones share the pipeline.
#[derive(Clone)]
pub struct RecipeClient {
    pipeline: Arc<RequestPipeline>,
}

impl RecipeClient {
    /// Client over a live HTTP transport.
    pub fn new(base_url: String, session: SessionHandle, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(base_url)), session, navigator)
    }

    /// Client over any transport; tests inject a scripted fake here.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            pipeline: Arc::new(RequestPipeline::new(transport, session, navigator)),
        }
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    // Authentication operations
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .pipeline
            .execute(post_json("/auth/login", &request)?)
            .await?;
        auth_payload(response)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .pipeline
            .execute(post_json("/auth/register", &request)?)
            .await?;
        auth_payload(response)
    }

    // Recipe operations
    pub async fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>, ApiError> {
        let mut path = String::from("/recipes");
        if let Some(query) = search {
            if !query.is_empty() {
                path.push_str(&format!("?search={}", urlencoding::encode(query)));
            }
        }

        let response = self.pipeline.execute(ApiRequest::get(path)).await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to load recipes"));
        }

        Ok(response.json::<RecipeList>()?.into_vec())
    }

    /// Recipes created by the authenticated user.
    pub async fn my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let response = self.pipeline.execute(ApiRequest::get("/recipes/my")).await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to load your recipes"));
        }

        Ok(response.json::<RecipeList>()?.into_vec())
    }

    pub async fn get_recipe(&self, id: i64) -> Result<Recipe, ApiError> {
        let response = self
            .pipeline
            .execute(ApiRequest::get(format!("/recipes/{}", id)))
            .await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to load recipe"));
        }

        response.json()
    }

    pub async fn create_recipe(&self, request: CreateRecipeRequest) -> Result<Recipe, ApiError> {
        request.validate()?;

        let response = self
            .pipeline
            .execute(post_json("/recipes", &request)?)
            .await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to create recipe"));
        }

        response.json()
    }

    // Ingredient catalog
    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        let response = self
            .pipeline
            .execute(ApiRequest::get("/ingredients"))
            .await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to load ingredients"));
        }

        Ok(response.json::<IngredientList>()?.into_vec())
    }

    // Profile operations
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let response = self.pipeline.execute(ApiRequest::get("/profile")).await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to load profile"));
        }

        response.json()
    }

    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        request.validate()?;

        let response = self
            .pipeline
            .execute(put_json("/profile", &request)?)
            .await?;
        if !response.is_success() {
            return Err(fail(&response, "failed to update profile"));
        }

        response.json()
    }
}

fn post_json<T: Serialize>(path: &str, body: &T) -> Result<ApiRequest, ApiError> {
    let value = serde_json::to_value(body)
        .map_err(|e| ApiError::Transport(format!("failed to encode request body: {}", e)))?;
    Ok(ApiRequest::post(path, value))
}

fn put_json<T: Serialize>(path: &str, body: &T) -> Result<ApiRequest, ApiError> {
    let value = serde_json::to_value(body)
        .map_err(|e| ApiError::Transport(format!("failed to encode request body: {}", e)))?;
    Ok(ApiRequest::put(path, value))
}

/// Map a non-success auth response or extract the payload.
///
/// Login and register are anonymous calls, so a 401 here means rejected
/// credentials, not an expired session.
fn auth_payload(response: ApiResponse) -> Result<AuthPayload, ApiError> {
    if !response.is_success() {
        let message = server_message(&response);
        return Err(match response.status {
            400 | 401 => ApiError::Auth(
                message.unwrap_or_else(|| "invalid email or password".to_string()),
            ),
            403 => ApiError::Auth(
                message.unwrap_or_else(|| "access denied: account may be disabled".to_string()),
            ),
            409 => ApiError::Auth(
                message.unwrap_or_else(|| "an account with this email already exists".to_string()),
            ),
            status => ApiError::Server {
                status,
                message: message.unwrap_or_else(|| "authentication failed".to_string()),
            },
        });
    }

    response.json()
}

/// Map a non-success data response to the error taxonomy. The pipeline has
/// already applied the forced-logout side effect for 401/403 by the time
/// this runs.
fn fail(response: &ApiResponse, context: &str) -> ApiError {
    let message = server_message(response)
        .unwrap_or_else(|| format!("{} (status {})", context, response.status));

    match response.status {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        status => ApiError::Server { status, message },
    }
}

/// Human-readable message from an error body, when the server sent one.
/// Handles both `{"error": ...}` and `{"message": ...}` shapes.
fn server_message(response: &ApiResponse) -> Option<String> {
    response
        .body
        .get("error")
        .or_else(|| response.body.get("message"))
        .and_then(|value| value.as_str())
        .map(|message| message.to_string())
}
