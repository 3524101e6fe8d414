use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    app::build_app,
    config::{AppConfig, JwtConfig, DEFAULT_TOKEN_TTL_HOURS},
    state::AppState,
    store::MemoryStore,
};

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "memory:".into(),
        max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        },
    }
}

pub fn test_state() -> AppState {
    AppState::from_parts(Arc::new(MemoryStore::new()), Arc::new(test_config()))
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (build_app(state.clone()), state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Registers a user and returns `(id, token)`.
pub async fn register(app: &Router, username: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/register/",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    let id = body["id"].as_i64().unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (id, token)
}

/// Creates an advertisement as the token's owner and returns its id.
pub async fn create_advertisement(app: &Router, token: &str, title: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/adv/",
        Some(token),
        Some(json!({"title": title, "description": "Barely used"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["id"].as_i64().unwrap()
}
