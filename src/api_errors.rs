use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
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
            AppError::NotFound(s) => (StatusCode::NOT_FOUND, s),
            AppError::BadGateway(s) => (StatusCode::BAD_GATEWAY, s),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg.clone() })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} '{id}' not found"))
            }
            err @ (StoreError::Catalog { .. }
            | StoreError::UpstreamStatus { .. }
            | StoreError::UpstreamBody { .. }) => {
                AppError::BadGateway(err.to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
