//! HTTP Error Handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义（与 HTTP 状态码一致）
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn status_and_errno(&self) -> (StatusCode, i32) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, errno::NOT_FOUND),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, errno::BAD_REQUEST),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, errno::INTERNAL_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_errno();
        let msg = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = code, error = %msg, "Resource not found");
                msg
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = code, error = %msg, "Bad request");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = code, error = %msg, "Internal server error");
                msg
            }
        };

        (status, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<crate::application::ApplicationError> for ApiError {
    fn from(e: crate::application::ApplicationError) -> Self {
        match e {
            crate::application::ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            crate::application::ApplicationError::InvalidInput(msg) => ApiError::BadRequest(msg),
            crate::application::ApplicationError::StorageError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::InvalidInput("bad".to_string()), StatusCode::BAD_REQUEST),
            (ApplicationError::not_found("Manga page", "x"), StatusCode::NOT_FOUND),
            (ApplicationError::StorageError("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            let response = ApiError::from(error).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
