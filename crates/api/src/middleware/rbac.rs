//! Authorization extractors layered on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use userhub_core::error::CoreError;
use userhub_core::roles::is_admin;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the administrator. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<Resp>> {
///     Ok(Json(Resp::ok()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(user.user_id) {
            tracing::debug!(user_id = user.user_id, "Admin check failed");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin privileges required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
