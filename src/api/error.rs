use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::MergeError;
use crate::pipeline::Diagnostic;

use super::types::{ErrorResponse, diagnostics_json};

/// API-specific errors with HTTP status code mapping.
#[derive(Debug)]
pub enum ApiError {
    NoValidInput(Vec<Diagnostic>),
    EmptyQuery,
    NoMatch(String),
    InvalidAction(String),
    SessionFinished,
    SessionNotFound(String),
    InvalidRequest(String),
    Internal(String),
}

impl From<MergeError> for ApiError {
    fn from(err: MergeError) -> Self {
        match err {
            MergeError::NoValidInput => ApiError::NoValidInput(Vec::new()),
            MergeError::EmptyQuery => ApiError::EmptyQuery,
            MergeError::NoMatch(key) => ApiError::NoMatch(key),
            MergeError::InvalidAction { .. } => ApiError::InvalidAction(err.to_string()),
            MergeError::SessionFinished => ApiError::SessionFinished,
            MergeError::SessionNotFound(id) => ApiError::SessionNotFound(id),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut diagnostics = Vec::new();
        let (status, code, message) = match self {
            ApiError::NoValidInput(found) => {
                diagnostics = diagnostics_json(&found);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_VALID_INPUT",
                    MergeError::NoValidInput.to_string(),
                )
            }
            ApiError::EmptyQuery => (
                StatusCode::BAD_REQUEST,
                "EMPTY_QUERY",
                MergeError::EmptyQuery.to_string(),
            ),
            ApiError::NoMatch(key) => (
                StatusCode::NOT_FOUND,
                "NO_MATCH",
                MergeError::NoMatch(key).to_string(),
            ),
            ApiError::InvalidAction(msg) => (StatusCode::CONFLICT, "INVALID_ACTION", msg),
            ApiError::SessionFinished => (
                StatusCode::CONFLICT,
                "SESSION_FINISHED",
                MergeError::SessionFinished.to_string(),
            ),
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{}' not found", id),
            ),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            diagnostics,
        };

        (status, Json(body)).into_response()
    }
}
