use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;

use recipebook_client::client::{ApiRequest, ApiResponse, RecipeClient, Transport};
use recipebook_client::error::ApiError;
use recipebook_client::navigator::Navigator;
use recipebook_client::session::{SessionHandle, SessionStore, TOKEN_KEY, USER_ID_KEY};
use recipebook_client::storage::{KeyValueStorage, MemoryStorage};

/// A request as the fake transport saw it, credential already attached.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

enum Outcome {
    Respond { status: u16, body: Value },
    NetworkError(String),
}

struct Route {
    method: Method,
    path: String,
    outcome: Outcome,
}

/// Scripted transport: serves canned responses by (method, path) and records
/// every request it dispatches.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes.lock().push(Route {
            method,
            path: path.to_string(),
            outcome: Outcome::Respond { status, body },
        });
    }

    pub fn fail_with(&self, method: Method, path: &str, message: &str) {
        self.routes.lock().push(Route {
            method,
            path: path.to_string(),
            outcome: Outcome::NetworkError(message.to_string()),
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().push(RecordedRequest {
            method: request.method.clone(),
            path: request.path.clone(),
            bearer: request.bearer.clone(),
            body: request.body.clone(),
        });

        let routes = self.routes.lock();
        let route = routes
            .iter()
            .find(|route| route.method == request.method && route.path == request.path)
            .ok_or_else(|| {
                ApiError::Transport(format!(
                    "no scripted response for {} {}",
                    request.method, request.path
                ))
            })?;

        match &route.outcome {
            Outcome::Respond { status, body } => Ok(ApiResponse {
                status: *status,
                body: body.clone(),
            }),
            Outcome::NetworkError(message) => Err(ApiError::Transport(message.clone())),
        }
    }
}

/// Transport whose requests never complete; for cancellation tests.
pub struct HangingTransport;

#[async_trait]
impl Transport for HangingTransport {
    async fn dispatch(&self, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

/// Navigator that records forced redirects instead of performing them.
pub struct RecordingNavigator {
    path: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            path: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().clone()
    }

    fn redirect_to(&self, path: &str) {
        let mut current = self.path.lock();
        self.redirects.lock().push(path.to_string());
        *current = path.to_string();
    }
}

/// Fully wired core over fakes: the shape every test starts from.
pub struct TestApp {
    pub transport: Arc<FakeTransport>,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: SessionHandle,
    pub client: RecipeClient,
    pub store: SessionStore,
}

impl TestApp {
    /// App "running" at an authenticated location with empty storage.
    pub fn new() -> Self {
        Self::at("/dashboard")
    }

    pub fn at(path: &str) -> Self {
        let transport = Arc::new(FakeTransport::new());
        let storage = Arc::new(MemoryStorage::new());
        let navigator = Arc::new(RecordingNavigator::at(path));
        let session = SessionHandle::new(storage.clone());
        let client = RecipeClient::with_transport(
            transport.clone(),
            session.clone(),
            navigator.clone(),
        );
        let store = SessionStore::new(session.clone(), client.clone());

        Self {
            transport,
            storage,
            navigator,
            session,
            client,
            store,
        }
    }

    /// Seed a persisted credential, as if a previous run had logged in.
    pub fn seed_credentials(&self, token: &str, user_id: &str) {
        self.storage.set(TOKEN_KEY, token);
        self.storage.set(USER_ID_KEY, user_id);
    }

    /// Seed + rehydrate: the app starts already authenticated.
    pub fn authenticated(token: &str, user_id: &str) -> Self {
        let app = Self::new();
        app.seed_credentials(token, user_id);
        app.store.bootstrap();
        app
    }
}

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
