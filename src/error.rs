use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{store::StoreError, validation::FieldErrors};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation Failed")]
    ValidationFailed(FieldErrors),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Unexpected error has occurred")]
    Unexpected,
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Backend(message) => AppError::PersistenceUnavailable(message),
            StoreError::Missing(_) => AppError::NotFound,
            StoreError::Conflict(_) => AppError::Unexpected,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PersistenceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            AppError::ValidationFailed(errors) => (
                status,
                Json(json!({ "error": "Validation Failed", "fieldErrors": errors })),
            )
                .into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}
