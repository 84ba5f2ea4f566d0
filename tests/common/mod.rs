// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use syncup_server::{
    api::router,
    auth::{AuthService, ManualClock, TokenCodec},
    state::AppState,
    storage::{FileStorage, StoragePaths},
};

pub const TEST_SECRET: &[u8] = b"integration-secret-0123456789abc";

pub struct TestApp {
    pub app: Router,
    pub clock: Arc<ManualClock>,
    pub state: AppState,
    _temp: TempDir,
}

/// App over a temporary data directory, tokens valid for one hour.
pub fn test_app() -> TestApp {
    let temp = TempDir::new().unwrap();
    let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
    storage.initialize().unwrap();
    let storage = Arc::new(storage);

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let auth = AuthService::new(
        TokenCodec::new(TEST_SECRET),
        Duration::seconds(3600),
        storage.clone(),
    );
    let state = AppState::new(storage, auth).with_clock(clock.clone());

    TestApp {
        app: router(state.clone()),
        clock,
        state,
        _temp: temp,
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(json_body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request(method, uri, token, body))
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(json!({})))
}

/// Register `username` with password `password123`.
pub async fn register(app: &Router, username: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "first_name": "test",
            "last_name": "user",
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
}

pub async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {username}: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Register and log in.
pub async fn signup(app: &Router, username: &str) -> String {
    register(app, username).await;
    login(app, username).await
}

/// Create a list and return its ID.
pub async fn create_list(app: &Router, token: &str, title: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/list/create",
        Some(token),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create list: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Create a task and return its ID.
pub async fn create_task(app: &Router, token: &str, list_id: &str, description: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/list/{list_id}/task/create"),
        Some(token),
        Some(json!({ "description": description })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create task: {body}");
    body["id"].as_str().unwrap().to_string()
}

pub async fn add_collaborator(app: &Router, token: &str, list_id: &str, username: &str) {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/list/{list_id}/collaborator/add"),
        Some(token),
        Some(json!({ "collaborators": [username] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add collaborator: {body}");
}

pub fn auth_failed() -> Value {
    json!({ "error": "Authentication failed", "error_code": "authentication_failed" })
}
