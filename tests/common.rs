// ABOUTME: Shared test utilities: quiet logging, stub backend, client construction
// ABOUTME: The stub backend emulates the REST surface on an ephemeral port via axum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
#![allow(missing_docs)]

//! Shared test utilities for the `cartwise` crate
//!
//! Provides a configurable stub of the backend REST surface so client and
//! controller tests exercise real HTTP round trips without a real backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{json, Value};

use cartwise::client::ApiClient;
use cartwise::config::ClientConfig;
use cartwise::session::Session;
use cartwise_core::models::{Nutriments, Product};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Mutable state behind the stub backend
#[derive(Default)]
pub struct StubState {
    /// Barcodes the stubbed product database knows
    pub catalog: Mutex<HashMap<String, Product>>,
    /// Current cart contents
    pub cart: Mutex<Vec<Product>>,
    /// Email on file for the test user; `None` models "no email"
    pub user_email: Mutex<Option<String>>,
    /// Names the cart was saved under
    pub saved: Mutex<Vec<String>>,
    /// Captured `/email/send` payloads
    pub emails: Mutex<Vec<Value>>,
    /// When set, `/email/send` answers 500
    pub email_fails: AtomicBool,
    /// When set, every authenticated endpoint answers 401
    pub reject_auth: AtomicBool,
    /// When set, `GET /cart` answers 404 (no cart yet)
    pub cart_missing: AtomicBool,
    /// When set, `/auth/register` answers 400 with this detail message
    pub register_detail: Mutex<Option<String>>,
    /// Artificial latency for `/cart/add/{barcode}` in milliseconds
    pub add_delay_ms: AtomicU64,
    /// Total requests served, across all endpoints
    pub hits: AtomicUsize,
}

impl StubState {
    pub fn seed_catalog(&self, products: impl IntoIterator<Item = Product>) {
        let mut catalog = self.catalog.lock().unwrap();
        for product in products {
            catalog.insert(product.code.clone(), product);
        }
    }

    pub fn seed_cart(&self, products: impl IntoIterator<Item = Product>) {
        self.cart.lock().unwrap().extend(products);
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A running stub backend bound to an ephemeral local port
pub struct StubBackend {
    pub base_url: String,
    pub state: Arc<StubState>,
}

/// Spawn a stub backend with empty state.
pub async fn spawn_backend() -> StubBackend {
    init_test_logging();

    let state = Arc::new(StubState::default());
    *state.user_email.lock().unwrap() = Some("test@example.com".to_owned());

    let app = router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub backend");
    });

    StubBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Client pointed at the stub backend with a fresh in-memory session.
pub fn client_for(backend: &StubBackend) -> ApiClient {
    let config = ClientConfig {
        base_url: backend.base_url.clone(),
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    };
    ApiClient::new(&config, Arc::new(Session::in_memory()))
}

/// Client that has already logged in against the stub backend.
pub async fn logged_in_client(backend: &StubBackend) -> ApiClient {
    let client = client_for(backend);
    client
        .login("test@example.com", "password")
        .await
        .expect("stub login");
    client
}

/// A syntactically valid JWT whose `exp` claim lies `exp_offset_secs` from
/// now. Unsigned: the client only decodes the payload.
pub fn make_jwt(exp_offset_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "1", "exp": exp}).to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// Product fixture with explicit nutriments.
pub fn product(code: &str, name: &str, carbs: f64, proteins: f64, fat: f64, kcal: f64) -> Product {
    Product {
        code: code.to_owned(),
        name: name.to_owned(),
        nutriments: Nutriments {
            carbohydrates: Some(carbs),
            proteins: Some(proteins),
            fat: Some(fat),
            energy_kcal: Some(kcal),
        },
    }
}

// ── Stub routes ─────────────────────────────────────────────────────────

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/cart", get(get_cart))
        .route("/cart/add/:barcode", get(add_product))
        .route("/cart/remove/:barcode", get(remove_product))
        .route("/cart/delete", get(delete_cart))
        .route("/cart/save", post(save_cart))
        .route("/email/send", post(send_email))
        .with_state(state)
}

fn authed(state: &StubState, headers: &HeaderMap) -> bool {
    if state.reject_auth.load(Ordering::SeqCst) {
        return false;
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Not authenticated"})),
    )
}

async fn register(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if let Some(detail) = state.register_detail.lock().unwrap().clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": detail})));
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": 1,
            "name": body.get("name").cloned().unwrap_or(Value::Null),
            "email": body.get("email").cloned().unwrap_or(Value::Null),
            "carts": [],
        })),
    )
}

async fn login(
    State(state): State<Arc<StubState>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !form.contains_key("username") || !form.contains_key("password") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials."})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({"access_token": make_jwt(3600), "token_type": "bearer"})),
    )
}

async fn me(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let saved = state.saved.lock().unwrap();
    let carts: Vec<Value> = saved
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"id": i as i64 + 1, "name": name, "cart_data": []}))
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "id": 1,
            "name": "Test User",
            "email": state.user_email.lock().unwrap().clone(),
            "carts": carts,
        })),
    )
}

async fn get_cart(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !authed(&state, &headers) {
        return unauthorized();
    }
    if state.cart_missing.load(Ordering::SeqCst) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Cart not found"})),
        );
    }

    let cart = state.cart.lock().unwrap();
    (
        StatusCode::OK,
        Json(json!({
            "cart": {
                "total_items": cart.len(),
                "products": cart.clone(),
            }
        })),
    )
}

async fn add_product(
    State(state): State<Arc<StubState>>,
    Path(barcode): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let delay = state.add_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let found = state.catalog.lock().unwrap().get(&barcode).cloned();
    match found {
        Some(item) => {
            state.cart.lock().unwrap().push(item);
            (
                StatusCode::OK,
                Json(json!({"msg": format!("{barcode} added!")})),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Product not found"})),
        ),
    }
}

async fn remove_product(
    State(state): State<Arc<StubState>>,
    Path(barcode): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !authed(&state, &headers) {
        return unauthorized();
    }

    let mut cart = state.cart.lock().unwrap();
    let before = cart.len();
    cart.retain(|p| p.code != barcode);
    if cart.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Product not found in cart"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({"msg": format!("{barcode} removed!")})),
    )
}

async fn delete_cart(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !authed(&state, &headers) {
        return unauthorized();
    }

    state.cart.lock().unwrap().clear();
    (StatusCode::OK, Json(json!({"msg": "Cart deleted!"})))
}

async fn save_cart(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if !authed(&state, &headers) {
        return unauthorized();
    }
    if state.cart.lock().unwrap().is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Cart not found or empty"})),
        );
    }

    let name = query
        .get("cart_name")
        .cloned()
        .unwrap_or_else(|| "My Cart".to_owned());
    state.saved.lock().unwrap().push(name);
    (StatusCode::OK, Json(json!({"msg": "Cart saved!"})))
}

async fn send_email(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if state.email_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "SMTP relay unavailable"})),
        );
    }

    state.emails.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({"message": "Email queued"})))
}
