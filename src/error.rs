use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application error taxonomy. Every failure a handler can return maps to a
/// stable status code and a stable `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    EmailTaken,

    /// Deliberately the same message for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("User not found")]
    UserNotFound,

    #[error("user store failure")]
    Storage(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error("Failed to fetch movies")]
    Catalog(#[source] anyhow::Error),

    /// Single-entry lookup failure. Same status as `Catalog`, but the by-id
    /// route answers with the singular message.
    #[error("Failed to fetch movie")]
    CatalogLookup(#[source] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::EmailTaken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::Catalog(_)
            | AppError::CatalogLookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal causes are logged here and never leak into the body.
        match &self {
            AppError::Storage(e) => error!(error = %e, "user store failure"),
            AppError::Internal(e) => error!(error = %e, "internal failure"),
            AppError::Catalog(e) | AppError::CatalogLookup(e) => {
                error!(error = %e, "catalog request failed")
            }
            _ => {}
        }
        let message = match &self {
            AppError::Storage(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
