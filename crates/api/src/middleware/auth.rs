//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use userhub_core::error::AuthFailure;
use userhub_core::token::TokenError;
use userhub_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the `Authorization: Bearer <token>` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<Resp>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(Resp::ok()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user id the session token was issued for.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::unauthorized(AuthFailure::NotAuthenticated))?;

        let user_id = state.sessions.resolve_now(token).map_err(|err| {
            tracing::debug!(error = %err, "Rejected session token");
            match err {
                TokenError::Expired => AppError::unauthorized(AuthFailure::ExpiredToken),
                _ => AppError::unauthorized(AuthFailure::InvalidToken),
            }
        })?;

        Ok(AuthUser { user_id })
    }
}

/// Extract the credentials from a `Bearer` authorization value. The scheme
/// is matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
