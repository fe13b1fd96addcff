//! Handler for `POST /login`.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::extract::{Form, Json};
use crate::state::AppState;

/// Form body for `POST /login` (`application/x-www-form-urlencoded`).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /api/v1/login
///
/// Exchange a name and password for a bearer session token. Unknown names
/// and wrong passwords get the same answer.
pub async fn login(
    State(state): State<AppState>,
    Form(input): Form<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let mut conn = state.pool.acquire().await?;
    let user_id = UserDirectory::authenticate(&mut conn, &input.username, &input.password)
        .await?
        .ok_or_else(|| {
            tracing::info!(name = %input.username, "Login failed");
            AppError::BadRequest("login failed".into())
        })?;

    let access_token = state
        .sessions
        .issue_now(user_id)
        .map_err(|e| AppError::InternalError(format!("Failed to issue session token: {e}")))?;

    tracing::info!(user_id, "Login succeeded");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
