use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Everything a handler can reject with. `Display` doubles as the wire code
/// in the `{"error": <code>}` response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid")]
    Invalid,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not_found")]
    NotFound,
    #[error("exists")]
    Exists,
    /// Repeat like: conflicts instead of succeeding idempotently, and the
    /// body reports the unchanged like count.
    #[error("already_liked")]
    AlreadyLiked { likes: u64 },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Invalid => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Exists | ApiError::AlreadyLiked { .. } => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.to_string() });
        if let ApiError::AlreadyLiked { likes } = &self {
            body["likes"] = json!(likes);
        }
        (self.status(), Json(body)).into_response()
    }
}
