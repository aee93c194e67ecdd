//! Router-level helpers shared by the handler tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    app::build_app,
    config::{AppConfig, JwtConfig},
    state::AppState,
    store::memory::MemoryStore,
};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 30,
            },
        };
        let store = Arc::new(MemoryStore::default());
        let router = build_app(AppState::from_store(config, store.clone()));
        Self { router, store }
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    // Non-JSON bodies come back as a string so a test can still assert on them.
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn call(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    send(app, req.body(body).unwrap()).await
}

pub async fn register(
    app: &TestApp,
    username: &str,
    email: &str,
    password: &str,
) -> (StatusCode, Value) {
    let body = json!({"username": username, "email": email, "password": password});
    call(app, "POST", "/auth/register", None, Some(body)).await
}

pub async fn login(app: &TestApp, username: &str, password: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap();
    send(app, req).await
}

/// Registers `name` and returns a fresh access token for it.
pub async fn signup(app: &TestApp, name: &str) -> String {
    let (status, _) = register(app, name, &format!("{name}@example.com"), "hunter22").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = login(app, name, "hunter22").await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}
