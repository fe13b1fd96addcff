//! Greeting endpoints.

use axum::extract::State;
use userhub_core::error::CoreError;
use userhub_db::models::user::name_column;

use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthUser;
use crate::response::Resp;
use crate::state::AppState;

/// GET /api/v1/hello/{name}
pub async fn hello(Path(name): Path<String>) -> Json<Resp> {
    Json(Resp::message(format!("Hello, {name}!")))
}

/// GET /api/v1/hello
///
/// Greet the caller by their stored name.
pub async fn hello_me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Resp>> {
    let mut conn = state.pool.acquire().await?;
    let name = UserDirectory::get_projection(&mut conn, user.user_id, &name_column())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                id: user.user_id,
            })
        })?;
    Ok(Json(Resp::message(format!("Hello, {name}!"))))
}
