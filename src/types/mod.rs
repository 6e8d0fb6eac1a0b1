//! Shared types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration validation failed")]
    Validation {
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Pool deployment failed: {details}")]
    Deployment {
        details: String,
        transaction_hashes: Vec<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

#[derive(Serialize)]
struct ValidationErrorResponse {
    error: String,
    errors: Vec<String>,
    warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentErrorResponse {
    error: String,
    details: String,
    /// Hashes submitted before the failure, for manual inspection
    transaction_hashes: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { errors, warnings } => {
                let body = Json(ValidationErrorResponse {
                    error: "Configuration validation failed".to_string(),
                    errors,
                    warnings,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Deployment {
                details,
                transaction_hashes,
            } => {
                let body = Json(DeploymentErrorResponse {
                    error: "Pool deployment failed".to_string(),
                    details,
                    transaction_hashes,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            other => {
                let (status, code) = match &other {
                    ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
                    ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
                };
                let body = Json(ErrorResponse {
                    error: other.to_string(),
                    code: code.to_string(),
                });
                (status, body).into_response()
            }
        }
    }
}
