use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::GenScoreError;

/// Errors that surface as a non-200 HTTP status.
///
/// `/evaluate` never returns these for model failures; those are folded into
/// a blocking verdict. Only malformed requests and the diagnostic ping use them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            AppError::BadGateway(s) => (StatusCode::BAD_GATEWAY, s),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg.clone() })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<GenScoreError> for AppError {
    fn from(err: GenScoreError) -> Self {
        match err {
            GenScoreError::Config { message } => AppError::Internal(message),
            GenScoreError::Network { .. }
            | GenScoreError::Upstream { .. }
            | GenScoreError::EmptyReply { .. }
            | GenScoreError::Timeout { .. } => AppError::BadGateway(err.to_string()),
            GenScoreError::Unparsable { .. } | GenScoreError::Serialization { .. } => {
                AppError::Internal(err.to_string())
            }
        }
    }
}
