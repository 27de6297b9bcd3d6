//! Mock storefront backend for pipeline tests.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use storefront_client::auth::SessionListener;
use storefront_client::config::Config;
use storefront_client::storage::{ClientStorage, MemoryStorage, ACCESS_KEY, REFRESH_KEY};
use storefront_client::ApiClient;

/// Behaviour knobs and observations of the mock backend
pub struct MockState {
    /// Access token the resource endpoints currently accept
    pub valid_access: Mutex<String>,

    /// Refresh token the refresh endpoint accepts
    pub valid_refresh: String,

    /// Token handed out by a successful refresh
    pub next_access: String,

    /// Refresh token returned alongside, when rotation is enabled
    pub rotated_refresh: Option<String>,

    /// Simulated latency of the refresh endpoint
    pub refresh_delay: Duration,

    /// When false the refresh endpoint always answers 401
    pub refresh_ok: bool,

    pub refresh_calls: AtomicUsize,

    /// Authorization header of every resource request, in arrival order
    pub seen_auth: Mutex<Vec<(String, Option<String>)>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            valid_access: Mutex::new("a1".to_string()),
            valid_refresh: "r1".to_string(),
            next_access: "a2".to_string(),
            rotated_refresh: None,
            refresh_delay: Duration::from_millis(0),
            refresh_ok: true,
            refresh_calls: AtomicUsize::new(0),
            seen_auth: Mutex::new(Vec::new()),
        }
    }
}

impl MockState {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn seen_auth(&self, path: &str) -> Vec<Option<String>> {
        self.seen_auth
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, auth)| auth.clone())
            .collect()
    }
}

/// Mock backend bound to an ephemeral port
pub struct MockBackend {
    pub state: Arc<MockState>,
    url: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBackend {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let app = Router::new()
            .route("/api/auth/login/", post(handle_login))
            .route("/api/token/refresh/", post(handle_refresh))
            .route("/api/auth/profile/", get(handle_profile))
            .route("/api/cart/", get(handle_cart))
            .route("/api/always-401/", get(handle_always_unauthorized))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            state,
            url: format!("http://127.0.0.1:{}/api", port),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Session listener that counts how often it fired
#[derive(Default)]
pub struct ExpiryCounter {
    calls: AtomicUsize,
}

impl ExpiryCounter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionListener for ExpiryCounter {
    fn session_expired(&self, login_path: &str) {
        assert_eq!(login_path, "/login");
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Client wired to the backend, with in-memory storage and a counting listener
pub fn client_for(
    backend: &MockBackend,
    access: Option<&str>,
    refresh: Option<&str>,
) -> (ApiClient, MemoryStorage, Arc<ExpiryCounter>) {
    let storage = MemoryStorage::new();
    if let Some(access) = access {
        storage.set(ACCESS_KEY, access).unwrap();
    }
    if let Some(refresh) = refresh {
        storage.set(REFRESH_KEY, refresh).unwrap();
    }

    let expiry = Arc::new(ExpiryCounter::default());
    let client = ApiClient::new(&Config::with_base_url(backend.url()), Arc::new(storage.clone()))
        .unwrap()
        .with_session_listener(expiry.clone());

    (client, storage, expiry)
}

/// Memory storage whose writes can be switched to fail
#[derive(Clone, Default)]
pub struct FailingWrites {
    pub inner: MemoryStorage,
    pub fail: Arc<AtomicBool>,
}

impl ClientStorage for FailingWrites {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.remove(key)
    }
}

/// Like [`client_for`], but over storage that rejects writes once seeded
pub fn client_with_failing_writes(
    backend: &MockBackend,
) -> (ApiClient, FailingWrites, Arc<ExpiryCounter>) {
    let storage = FailingWrites::default();
    storage.inner.set(ACCESS_KEY, "a1").unwrap();
    storage.inner.set(REFRESH_KEY, "r1").unwrap();
    storage.fail.store(true, Ordering::SeqCst);

    let expiry = Arc::new(ExpiryCounter::default());
    let client = ApiClient::new(&Config::with_base_url(backend.url()), Arc::new(storage.clone()))
        .unwrap()
        .with_session_listener(expiry.clone());

    (client, storage, expiry)
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

fn guarded(state: &MockState, path: &str, headers: &HeaderMap, body: Value) -> Response {
    let auth = bearer(headers);
    state
        .seen_auth
        .lock()
        .unwrap()
        .push((path.to_string(), auth.clone()));

    let expected = format!("Bearer {}", state.valid_access.lock().unwrap());
    if auth.as_deref() == Some(expected.as_str()) {
        (StatusCode::OK, Json(body)).into_response()
    } else {
        unauthorized()
    }
}

async fn handle_login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        (StatusCode::OK, Json(json!({"access": "a1", "refresh": "r1"}))).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response()
    }
}

async fn handle_refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.refresh_delay).await;

    if !state.refresh_ok || body["refresh"] != state.valid_refresh.as_str() {
        return unauthorized();
    }

    *state.valid_access.lock().unwrap() = state.next_access.clone();

    let mut response = json!({"access": state.next_access});
    if let Some(ref rotated) = state.rotated_refresh {
        response["refresh"] = json!(rotated);
    }
    (StatusCode::OK, Json(response)).into_response()
}

async fn handle_profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    guarded(
        &state,
        "/auth/profile/",
        &headers,
        json!({"username": "alice", "email": "alice@example.com"}),
    )
}

async fn handle_cart(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    guarded(&state, "/cart/", &headers, json!({"id": 1, "items": []}))
}

async fn handle_always_unauthorized(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Response {
    state
        .seen_auth
        .lock()
        .unwrap()
        .push(("/always-401/".to_string(), bearer(&headers)));
    unauthorized()
}
