//! # API Error Handling
//!
//! One error type for every handler, rendered by [`IntoResponse`].
//!
//! ```text
//! ValidationErrors ─┐
//! JSON / query /    ├──► ApiError ──► 400 {"code":"VALIDATION_ERROR" | "INVALID_REQUEST",
//!   path rejection ─┘                       "message":..., "errors":[{field,message}]}
//! DbError::AmountOutOfRange ──► 400 VALIDATION_ERROR on `totalAmount`
//! DbError::NotFound ───► ApiError ──► 404 (empty body)
//! any other DbError ───► ApiError ──► 500 {"code":"INTERNAL_ERROR", ...}, logged
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use ordo_core::error::FieldMessage;
use ordo_core::{ValidationError, ValidationErrors, MAX_AMOUNT};
use ordo_db::DbError;

/// Error body for 400 and 500 responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldMessage>,
}

/// Handler error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Payload failed field rules.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Request could not be decoded (bad JSON, bad query string, bad path).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                debug!(%errors, "Rejected invalid payload");
                let body = ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: "One or more validation errors occurred.".to_string(),
                    errors: errors.field_messages(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }

            ApiError::InvalidRequest(message) => {
                debug!(%message, "Rejected malformed request");
                let body = ErrorBody {
                    code: "INVALID_REQUEST",
                    message,
                    errors: Vec::new(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }

            ApiError::NotFound(what) => {
                debug!(%what, "Not found");
                StatusCode::NOT_FOUND.into_response()
            }

            ApiError::Database(err) => {
                error!(error = %err, "Database error occurred");
                let body = ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "Internal server error".to_string(),
                    errors: Vec::new(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

// ========== Conversions ==========

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error.into())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::AmountOutOfRange(_) => ValidationError::TooLarge {
                field: "totalAmount".to_string(),
                max: MAX_AMOUNT,
            }
            .into(),
            other => ApiError::Database(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
