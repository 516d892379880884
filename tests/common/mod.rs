//! Shared harness: each test builds an isolated in-process app over a
//! throwaway data directory and drives it with tower's oneshot.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use quill_api::services::UserService;
use quill_api::{app, AppState};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_app() -> TestApp {
    let dir = std::env::temp_dir().join(format!("quill-test-{}", uuid::Uuid::new_v4()));
    let state = AppState::new(&dir).expect("failed to build app state");
    UserService::new(state.users.clone())
        .provision_defaults()
        .expect("failed to provision default users");
    TestApp {
        router: app(state.clone()),
        state,
    }
}

/// Send a request and return (status, parsed JSON body).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(router, method, uri, token, cookie, body).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };
    (status, value)
}

pub async fn send_raw(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    cookie: Option<&str>,
    body: Option<Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };
    router
        .clone()
        .oneshot(request)
        .await
        .expect("request failed")
}

pub struct Login {
    pub token: String,
    /// `session_id=<uuid>`, ready for a Cookie header
    pub cookie: String,
    pub user_id: i64,
    pub username: String,
}

pub async fn login(router: &Router, username: &str, password: &str) -> Login {
    let response = send_raw(
        router,
        "POST",
        "/api/login",
        None,
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .expect("cookie is not valid utf-8")
        .to_string();
    let cookie = set_cookie
        .split(';')
        .next()
        .expect("empty Set-Cookie header")
        .to_string();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read login body");
    let body: Value = serde_json::from_slice(&bytes).expect("login body is not JSON");

    Login {
        token: body["data"]["token"].as_str().expect("token missing").to_string(),
        cookie,
        user_id: body["data"]["user_id"].as_i64().expect("user_id missing"),
        username: body["data"]["username"]
            .as_str()
            .expect("username missing")
            .to_string(),
    }
}
