//! The authorized request pipeline.
//!
//! Every outbound call the app makes goes through [`RequestPipeline::execute`],
//! which applies two fixed stages around the transport:
//!
//! 1. **Attachment** - if a credential is currently held, it is attached as a
//!    bearer authorization header; otherwise the request goes out
//!    unauthenticated. This always happens before the request leaves the
//!    process.
//! 2. **Inspection** - if the server reports an authorization failure (HTTP
//!    401 or 403), the pipeline clears the persisted credential and session
//!    state and forces navigation to the login entry point, unless the user is
//!    already on an unauthenticated entry point. This always happens before
//!    the response is delivered, so by the time a caller sees the result the
//!    forced logout has been applied.
//!
//! Everything else - other statuses, network failures - passes through
//! unchanged. The pipeline never retries and never hides a failure from its
//! caller.
//!
//! The transport is a trait so tests can drive the pipeline with a scripted
//! fake instead of a live server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::navigator::{self, Navigator, LOGIN_PATH};
use crate::session::SessionHandle;

/// Per-request timeout applied by the HTTP transport.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// An outbound API request, before credential attachment.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, query string included.
    pub path: String,
    /// JSON body, if the method carries one.
    pub body: Option<serde_json::Value>,
    /// Bearer token; filled in by the attachment stage, never by callers.
    pub bearer: Option<String>,
    /// Optional cancellation token carried alongside the request.
    pub cancel: Option<CancellationToken>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::PUT, path, Some(body))
    }

    fn new(method: Method, path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            bearer: None,
            cancel: None,
        }
    }

    /// Attach a cancellation token; cancelling it resolves the request to
    /// [`ApiError::Cancelled`] without any session side effects.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// A response as seen by the inspection stage and the caller.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body; `Null` when the body was empty, a JSON string when
    /// the server answered with plain text.
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body into a typed payload.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body)
            .map_err(|e| ApiError::Transport(format!("invalid response from server: {}", e)))
    }
}

/// Transport seam under the pipeline.
///
/// Returns `Ok` for every completed HTTP exchange regardless of status code;
/// `Err` only for failures where no response was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// The real transport, backed by a shared `reqwest` client.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(REQUEST_TIMEOUT);
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("network error for {} {}: {}", request.method, url, e);
            ApiError::Transport(format!("failed to reach server: {}", e))
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read response body: {}", e)))?;

        let body = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        tracing::debug!("response status {} for {}", status, request.path);
        Ok(ApiResponse { status, body })
    }
}

/// The pipeline itself: transport plus the two collaborators the inspection
/// stage acts on.
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl RequestPipeline {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
        }
    }

    /// Run a request through attach, send, and inspect.
    ///
    /// HTTP responses of any status are returned as `Ok`; callers map
    /// non-success statuses to errors themselves. `Err` means the exchange
    /// did not complete (network failure or cancellation) and no session
    /// state was touched.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.bearer = self.session.token();

        let response = match request.cancel.clone() {
            Some(cancel) => tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("request to {} cancelled", request.path);
                    return Err(ApiError::Cancelled);
                }
                result = self.transport.dispatch(&request) => result?,
            },
            None => self.transport.dispatch(&request).await?,
        };

        self.inspect(&response);
        Ok(response)
    }

    /// The centralized unauthorized-response handling. Best-effort and
    /// fire-and-forget from the caller's perspective; the rejected result is
    /// still returned to whoever made the call.
    fn inspect(&self, response: &ApiResponse) {
        if response.status != 401 && response.status != 403 {
            return;
        }

        tracing::warn!(
            "authorization failure (status {}), clearing session",
            response.status
        );
        self.session.clear_credentials();

        let current = self.navigator.current_path();
        if navigator::is_auth_entry_point(&current) {
            tracing::debug!("already at {}, skipping redirect", current);
        } else {
            self.navigator.redirect_to(LOGIN_PATH);
        }
    }
}
