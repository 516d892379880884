//! POST /api/login and POST /api/logout.
//!
//! Login hands out two independent credentials: a signed bearer token in the
//! body and a session id in an HttpOnly cookie. Logout clears the session,
//! which is what actually revokes access.

use axum::{
    extract::{Extension, State},
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth::SESSION_COOKIE;
use crate::middleware::{ApiResponse, SessionHandle};
use crate::services::UserService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/login - verify credentials, start a session, issue a token
pub async fn login_post(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let users = UserService::new(state.users.clone());
    let user = users
        .verify(&username, &password)?
        .ok_or(ApiError::BadCredentials)?;

    let session_id = state.sessions.start(&user.username, user.id);
    let token = state.tokens.issue(user.id, &user.username)?;

    tracing::info!(user = %user.username, "login successful");

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}",
        SESSION_COOKIE,
        session_id,
        state.sessions.lifetime_secs()
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        ApiResponse::with_msg(
            "login successful",
            json!({
                "token": token,
                "user_id": user.id,
                "username": user.username,
            }),
        ),
    ))
}

/// POST /api/logout - clear the session behind the current request
pub async fn logout_post(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<impl IntoResponse, ApiError> {
    state.sessions.end(session.0);

    // Expire the cookie client-side as well
    let cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        ApiResponse::with_msg("logout successful", json!({})),
    ))
}
