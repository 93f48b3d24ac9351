use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use noteguard_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP- and policy-specific
/// variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` JSON bodies with stable machine codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `noteguard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A policy denial (ban, premium lock, session cap, invalid session,
    /// rate limit) with its stable machine code.
    #[error("{message}")]
    Policy { code: &'static str, message: String },

    /// A malformed or out-of-bounds byte range.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn access_banned() -> Self {
        AppError::Policy {
            code: "NOTE_ACCESS_BANNED",
            message: "Access to this note is banned for this account".into(),
        }
    }

    pub fn premium_locked() -> Self {
        AppError::Policy {
            code: "NOTE_PREMIUM_LOCKED",
            message: "This note requires an active premium subscription".into(),
        }
    }

    pub fn session_limit(cap: i64) -> Self {
        AppError::Policy {
            code: "NOTE_SESSION_LIMIT",
            message: format!("Concurrent view-session limit of {cap} reached for this note"),
        }
    }

    pub fn session_invalid() -> Self {
        AppError::Policy {
            code: "NOTE_SESSION_INVALID",
            message: "View session is invalid, expired, or revoked".into(),
        }
    }

    pub fn rate_limited() -> Self {
        AppError::Policy {
            code: "NOTE_RATE_LIMIT",
            message: "Too many content requests for this note, slow down".into(),
        }
    }
}

impl From<noteguard_core::range::RangeError> for AppError {
    fn from(err: noteguard_core::range::RangeError) -> Self {
        AppError::InvalidRange(err.to_string())
    }
}

impl From<opendal::Error> for AppError {
    fn from(err: opendal::Error) -> Self {
        AppError::InternalError(format!("Object store error: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP / policy errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Policy { code, message } => (StatusCode::FORBIDDEN, *code, message.clone()),
            AppError::InvalidRange(msg) => {
                (StatusCode::BAD_REQUEST, "NOTE_RANGE_INVALID", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
