use axum::http::StatusCode;
use axum::response::Response;

use crate::error::{code, error_response};

pub mod auth;
pub mod counter;
pub mod hello;
pub mod user;

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, code::NOT_FOUND, "Not Found")
}
