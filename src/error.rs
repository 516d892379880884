// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every authentication failure maps to 401 with a distinguishing message;
/// ownership/existence failures are deliberately collapsed into a single
/// `NotFoundOrForbidden` so a caller cannot tell "exists but not yours"
/// apart from "does not exist".
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation(String),
    NotFoundOrForbidden,

    // 401 Unauthorized
    BadCredentials,
    MissingToken,
    TokenInvalid(String),
    TokenExpired,
    SessionInvalid,
    SessionMismatch,

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Validation(_) => 400,
            ApiError::NotFoundOrForbidden => 400,
            ApiError::BadCredentials => 401,
            ApiError::MissingToken => 401,
            ApiError::TokenInvalid(_) => 401,
            ApiError::TokenExpired => 401,
            ApiError::SessionInvalid => 401,
            ApiError::SessionMismatch => 401,
            ApiError::Internal(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotFoundOrForbidden => "article not found or access denied".to_string(),
            ApiError::BadCredentials => "invalid username or password".to_string(),
            ApiError::MissingToken => {
                "missing bearer token in authorization header".to_string()
            }
            ApiError::TokenInvalid(detail) => format!("invalid token: {}", detail),
            ApiError::TokenExpired => "token expired, please log in again".to_string(),
            ApiError::SessionInvalid => {
                "no active login session, please log in again".to_string()
            }
            ApiError::SessionMismatch => {
                "session does not match token identity, please log in again".to_string()
            }
            ApiError::Internal(_) => {
                "an error occurred while processing your request".to_string()
            }
        }
    }

    /// Convert to the wire format `{code, msg}` shared by all error responses
    pub fn to_json(&self) -> Value {
        json!({
            "code": self.status_code(),
            "msg": self.message(),
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        // Log the real error but keep the client body generic
        tracing::error!("storage error: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::Expired => ApiError::TokenExpired,
            crate::auth::TokenError::Invalid(detail) => ApiError::TokenInvalid(detail),
            crate::auth::TokenError::InvalidSecret | crate::auth::TokenError::Generation(_) => {
                tracing::error!("token service error: {}", err);
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
