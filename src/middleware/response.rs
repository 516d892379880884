use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for successful API responses using the `{code, msg, data}`
/// envelope shared with error bodies.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub msg: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            msg: "ok".to_string(),
            data,
        }
    }

    pub fn with_msg(msg: impl Into<String>, data: T) -> Self {
        Self {
            msg: msg.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "code": 500,
                        "msg": "failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        Json(json!({
            "code": 200,
            "msg": self.msg,
            "data": data_value
        }))
        .into_response()
    }
}

/// Handler result alias: a success envelope or a structured ApiError.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
