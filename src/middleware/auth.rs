//! The request authorization gate.
//!
//! A bearer token proves identity cryptographically; the server-side session
//! proves the user is still logged in here. Both must hold and must name the
//! same username. Splitting the two is what makes logout meaningful despite
//! the stateless token: clearing the session kills access immediately even
//! while the token would verify until its natural expiry.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::SessionCheck;
use crate::error::ApiError;
use crate::AppState;

/// The authenticated identity resolved for a single request. Produced fresh
/// per request; never persisted.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
}

/// The session id the request arrived with, kept around so logout can end
/// exactly that session.
#[derive(Clone, Copy, Debug)]
pub struct SessionHandle(pub Uuid);

/// Authorization middleware. Each step is a hard gate; the first failure
/// short-circuits with a 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Bearer token must be present and well formed
    let token = extract_bearer(request.headers())?;

    // 2. Signature and expiry; TokenExpired / TokenInvalid propagate verbatim
    let claims = state.tokens.validate(&token)?;

    // 3. Cross-check the decoded identity against live session state
    let session_id = extract_session_cookie(request.headers()).ok_or(ApiError::SessionInvalid)?;
    match state.sessions.check(session_id, &claims.username) {
        SessionCheck::Valid => {}
        SessionCheck::NoSession => return Err(ApiError::SessionInvalid),
        SessionCheck::Mismatch => {
            tracing::warn!(user = %claims.username, "session username mismatch");
            return Err(ApiError::SessionMismatch);
        }
    }

    // 4. Hand the principal (and its session) to the handler
    request.extensions_mut().insert(Principal {
        user_id: claims.sub,
        username: claims.username,
    });
    request.extensions_mut().insert(SessionHandle(session_id));

    Ok(next.run(request).await)
}

/// Name of the cookie carrying the opaque session identifier.
pub const SESSION_COOKIE: &str = "session_id";

fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(ApiError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| ApiError::MissingToken)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::MissingToken),
    }
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
        .find_map(|value| Uuid::parse_str(value).ok())
}
