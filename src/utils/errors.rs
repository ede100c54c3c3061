use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
    pub timestamp: DateTime<Utc>,
}

/// Error taxonomy shared by every handler. The `&'static str` on the 400
/// variants is a machine-readable reason code (e.g. "duplicate-application")
/// surfaced in the `error` field of the response body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(HashMap<String, Vec<String>>),
    #[error("{1}")]
    BadRequest(&'static str, String),
    // Uniqueness violations answer with 400, not 409; clients key on the
    // reason code rather than the status.
    #[error("{1}")]
    Conflict(&'static str, String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation-error",
                "Validation failed".to_string(),
                Some(errors),
            ),
            AppError::BadRequest(code, msg) => (StatusCode::BAD_REQUEST, code, msg, None),
            AppError::Conflict(code, msg) => (StatusCode::BAD_REQUEST, code, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not-found", msg, None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            AppError::InternalServerError(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal-error", msg, None)
            }
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
            timestamp: Utc::now(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut error_map = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
                })
                .collect();
            error_map.insert(field.to_string(), messages);
        }

        AppError::ValidationError(error_map)
    }
}

// Store errors never leak driver detail to the caller.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    AppError::Conflict("conflict", "Resource already exists".to_string())
                } else if db_err.is_foreign_key_violation() {
                    AppError::Conflict(
                        "conflict",
                        "Resource is referenced by other records".to_string(),
                    )
                } else {
                    AppError::InternalServerError(
                        "A storage error occurred. Please try again.".to_string(),
                    )
                }
            }
            _ => AppError::InternalServerError(
                "A storage error occurred. Please try again.".to_string(),
            ),
        }
    }
}
