use std::any::Any;

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use userhub_core::error::{AuthFailure, CoreError};
use userhub_db::StoreError;

/// Numeric sub-codes carried in the `code` field of every error body.
///
/// `0` is reserved for success (see [`crate::response::Resp`]).
pub mod code {
    pub const BAD_REQUEST: u16 = 1;
    pub const VALIDATION: u16 = 2;
    pub const CONFLICT: u16 = 3;
    pub const NOT_FOUND: u16 = 4;
    pub const FORBIDDEN: u16 = 5;
    pub const NOT_AUTHENTICATED: u16 = 10;
    pub const INVALID_TOKEN: u16 = 11;
    pub const EXPIRED_TOKEN: u16 = 12;
    pub const INTERNAL: u16 = 50;
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{code, msg}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `userhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record store error from `userhub_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    JsonBody(#[from] JsonRejection),

    #[error(transparent)]
    FormBody(#[from] FormRejection),

    #[error(transparent)]
    PathParam(#[from] PathRejection),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn unauthorized(failure: AuthFailure) -> Self {
        AppError::Core(CoreError::Unauthorized(failure))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    code::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, code::VALIDATION, msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::BAD_REQUEST, code::CONFLICT, msg.clone()),
                CoreError::Unauthorized(failure) => {
                    let code = match failure {
                        AuthFailure::NotAuthenticated => code::NOT_AUTHENTICATED,
                        AuthFailure::InvalidToken => code::INVALID_TOKEN,
                        AuthFailure::ExpiredToken => code::EXPIRED_TOKEN,
                    };
                    (StatusCode::UNAUTHORIZED, code, failure.to_string())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, code::FORBIDDEN, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Persistence errors ---
            AppError::Store(StoreError::Sql(err)) => classify_sqlx_error(err),
            AppError::Store(err) => {
                tracing::error!(error = %err, "Record store misuse");
                internal()
            }
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Request shape errors ---
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, code::VALIDATION, errors.to_string())
            }
            AppError::JsonBody(rejection) => {
                (StatusCode::BAD_REQUEST, code::VALIDATION, rejection.body_text())
            }
            AppError::FormBody(rejection) => {
                (StatusCode::BAD_REQUEST, code::VALIDATION, rejection.body_text())
            }
            AppError::PathParam(rejection) => {
                (StatusCode::BAD_REQUEST, code::VALIDATION, rejection.body_text())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, code::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut response = error_response(status, code, &message);
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Render the `{code, msg}` error body with the given status.
pub fn error_response(status: StatusCode, code: u16, message: &str) -> Response {
    let body = json!({
        "code": code,
        "msg": message,
    });
    (status, axum::Json(body)).into_response()
}

/// Response for a panicking handler, for `CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, code::INTERNAL, INTERNAL_MESSAGE)
}

fn internal() -> (StatusCode, u16, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code::INTERNAL,
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to
///   a 400 conflict.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, u16, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            code::NOT_FOUND,
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::BAD_REQUEST,
                        code::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        sqlx::Error::PoolTimedOut => {
            tracing::error!("Timed out waiting for a database connection");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
