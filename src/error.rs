use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified application error type that maps to JSON HTTP responses.
///
/// Every error renders the API envelope `{ "success": false, "message": "..." }`.
pub enum AppError {
    /// 400 Bad Request (malformed or out-of-range input)
    Validation(String),
    /// 401 Unauthorized (missing or unparseable bearer token)
    Unauthenticated(String),
    /// 403 Forbidden (invalid token, insufficient role, or not the owner)
    Forbidden(String),
    /// 404 Not Found (referenced entity absent)
    NotFound(String),
    /// 409 Conflict (uniqueness violation, e.g. duplicate favorite or email)
    Conflict(String),
    /// 500 Internal Server Error (wraps any error, logs details, returns generic message)
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(err) => {
                tracing::error!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "success": false,
                "message": message,
            })),
        )
            .into_response()
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Map a database error to `Conflict` when it is a unique-constraint violation,
/// otherwise to `Internal`.
///
/// The unique indexes on ratings and favorites are the race-safety backstop for
/// check-then-insert sequences, so constraint violations must surface as 409
/// rather than 500.
pub fn conflict_or_internal(err: sea_orm::DbErr, conflict_message: &str) -> AppError {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(conflict_message.to_string())
        }
        _ => AppError::Internal(err.into()),
    }
}
