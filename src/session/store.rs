//! The session store: single source of truth for "is a user logged in, and who".
//!
//! State machine: `Unknown` (before the startup check) settles to either
//! `Anonymous` or `Authenticated`; `login`/`register` move `Anonymous` to
//! `Authenticated`; `logout` and a pipeline-signaled authorization failure
//! move it back. The forced transition goes through [`SessionHandle`], which
//! the request pipeline holds independently of this store's own operations.
//!
//! All state changes are applied synchronously and notify subscribers before
//! the mutating call returns; deliveries are serialized so two rapid changes
//! never interleave their notifications.

use std::sync::{Arc, Once};

use parking_lot::{Mutex, RwLock};

use crate::client::api::RecipeClient;
use crate::client::types::AuthPayload;
use crate::error::ApiError;
use crate::session::state::{SessionSnapshot, TOKEN_KEY, USER_ID_KEY};
use crate::storage::KeyValueStorage;

type Subscriber = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;

struct SessionInner {
    state: RwLock<SessionSnapshot>,
    storage: Arc<dyn KeyValueStorage>,
    // Held across apply + notify: serializes deliveries. Do not subscribe
    // from inside a notification.
    subscribers: Mutex<Vec<Subscriber>>,
    rehydrated: Once,
}

/// Shared handle to the session state.
///
/// Cloned into the request pipeline so an authorization failure can clear the
/// session without involving the store's own methods. Everything else should
/// go through [`SessionStore`].
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionSnapshot::initial()),
                storage,
                subscribers: Mutex::new(Vec::new()),
                rehydrated: Once::new(),
            }),
        }
    }

    /// Current state, as an owned snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.read().clone()
    }

    /// The currently held credential, if any.
    pub fn token(&self) -> Option<String> {
        self.inner.state.read().token.clone()
    }

    /// Register a callback invoked synchronously after every state change.
    pub fn subscribe(&self, subscriber: impl Fn(&SessionSnapshot) + Send + Sync + 'static) {
        self.inner.subscribers.lock().push(Box::new(subscriber));
    }

    /// Rehydrate from storage. Runs at most once per process lifetime; later
    /// calls are no-ops against the already-settled state.
    pub fn rehydrate(&self) {
        self.inner.rehydrated.call_once(|| {
            let token = self.inner.storage.get(TOKEN_KEY);
            let user_id = self.inner.storage.get(USER_ID_KEY);

            let (token, user_id) = match (token, user_id) {
                (Some(token), Some(user_id)) => (Some(token), Some(user_id)),
                (None, None) => (None, None),
                // Half a credential is no credential: drop the stale key.
                _ => {
                    tracing::warn!("incomplete stored credential, clearing it");
                    self.inner.storage.remove(TOKEN_KEY);
                    self.inner.storage.remove(USER_ID_KEY);
                    (None, None)
                }
            };

            if token.is_some() {
                tracing::info!("restored session from storage");
            }
            self.apply(|state| {
                state.token = token;
                state.user_id = user_id;
                state.loading = false;
            });
        });
    }

    /// Persist a fresh credential and move to `Authenticated`.
    pub(crate) fn store_credentials(&self, token: &str, user_id: &str) {
        self.inner.storage.set(TOKEN_KEY, token);
        self.inner.storage.set(USER_ID_KEY, user_id);
        self.apply(|state| {
            state.token = Some(token.to_string());
            state.user_id = Some(user_id.to_string());
        });
    }

    /// Clear the persisted credential and in-memory state unconditionally.
    ///
    /// Idempotent; safe to call when already anonymous. Used both by
    /// [`SessionStore::logout`] and by the pipeline's forced logout.
    pub fn clear_credentials(&self) {
        self.inner.storage.remove(TOKEN_KEY);
        self.inner.storage.remove(USER_ID_KEY);
        self.apply(|state| {
            state.token = None;
            state.user_id = None;
        });
    }

    fn apply(&self, mutate: impl FnOnce(&mut SessionSnapshot)) {
        let subscribers = self.inner.subscribers.lock();
        let snapshot = {
            let mut state = self.inner.state.write();
            mutate(&mut state);
            state.clone()
        };
        for subscriber in subscribers.iter() {
            subscriber(&snapshot);
        }
    }
}

/// The session store exposed to the UI tree.
///
/// Owns the three mutation entry points (`login`, `register`, `logout`) plus
/// the startup rehydration gate. UI components read state through
/// [`SessionStore::snapshot`] or [`SessionStore::subscribe`] and never mutate
/// it directly.
pub struct SessionStore {
    session: SessionHandle,
    api: RecipeClient,
}

impl SessionStore {
    pub fn new(session: SessionHandle, api: RecipeClient) -> Self {
        Self { session, api }
    }

    /// One-time startup check. `loading` stays true until this has run, so
    /// dependent UI can hold off instead of flashing a logged-out view.
    pub fn bootstrap(&self) {
        self.session.rehydrate();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&SessionSnapshot) + Send + Sync + 'static) {
        self.session.subscribe(subscriber);
    }

    /// The shared handle, for wiring a pipeline to this store.
    pub fn handle(&self) -> &SessionHandle {
        &self.session
    }

    /// Exchange credentials for a session.
    ///
    /// On success the credential is persisted, the state moves to
    /// `Authenticated`, and the server payload is returned so the caller can
    /// navigate. On failure the state is left untouched and the error
    /// propagates unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "email and password are required".to_string(),
            ));
        }

        tracing::info!("attempting login for {}", email);
        let payload = self.api.login(email, password).await?;
        self.adopt(&payload)?;
        tracing::info!("login successful for {}", email);
        Ok(payload)
    }

    /// Same contract as [`SessionStore::login`], different entry operation.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "name, email and password are required".to_string(),
            ));
        }

        tracing::info!("registering account for {}", email);
        let payload = self.api.register(name, email, password).await?;
        self.adopt(&payload)?;
        tracing::info!("registration successful for {}", email);
        Ok(payload)
    }

    /// Clear the session. Synchronous, always succeeds, idempotent.
    pub fn logout(&self) {
        tracing::info!("logging out");
        self.session.clear_credentials();
    }

    fn adopt(&self, payload: &AuthPayload) -> Result<(), ApiError> {
        // A 2xx without a token is a logical failure; the state must not move.
        match (payload.token.as_deref(), payload.user_id.as_deref()) {
            (Some(token), Some(user_id)) => {
                self.session.store_credentials(token, user_id);
                Ok(())
            }
            _ => {
                let message = payload
                    .error
                    .clone()
                    .unwrap_or_else(|| "authentication response missing token".to_string());
                tracing::error!("authentication rejected: {}", message);
                Err(ApiError::Auth(message))
            }
        }
    }
}
