#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use safeguard_api::{config::Config, db, routes, AppState};

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        db_max_connections: 1,
        jwt_secret: JWT_SECRET.into(),
        jwt_expiry_days: 7,
        // bcrypt's minimum cost keeps the suite fast.
        bcrypt_cost: 4,
        host: "127.0.0.1".into(),
        port: 0,
        checkpoint_interval_secs: 0,
    }
}

pub async fn test_state() -> AppState {
    let pool = db::create_memory_pool()
        .await
        .expect("failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    AppState {
        db: pool,
        config: Arc::new(test_config()),
    }
}

pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (routes::router(state.clone()), state)
}

/// Fire one request at the router and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(request).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body), None).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body), None).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None, None).await
}

/// Registers a parent with password `secret1` and returns the `data` object.
pub async fn register_parent(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = post(
        app,
        "/api/parents/register",
        json!({
            "name": name,
            "lastName": "Doe",
            "email": email,
            "password": "secret1",
            "phoneNumber": "555-0100",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"].clone()
}

/// Connects a child through the family code and returns the `data` object.
pub async fn connect_child(app: &Router, family_code: &str, name: &str, device_id: &str) -> Value {
    let (status, body) = post(
        app,
        "/api/children/connect",
        json!({
            "familyCode": family_code,
            "childName": name,
            "age": 10,
            "deviceId": device_id,
            "deviceInfo": "Pixel 7",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "connect failed: {body}");
    body["data"].clone()
}
