//! Handlers for the `/user` and `/users` resources.

use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use userhub_core::error::CoreError;
use userhub_core::types::DbId;
use userhub_db::models::user::{name_column, UserIdentity, UserSummary, UserTimes};
use validator::Validate;

use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::Resp;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /user` and `PUT /user/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub password: String,
}

/// Request body for `PATCH /user/{id}/name`.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: DbId,
}

#[derive(Debug, Serialize)]
pub struct NamePayload {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UsersPayload {
    pub users: Vec<UserSummary>,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/user
///
/// Register a new user. Duplicate names are rejected as a conflict.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserRequest>,
) -> AppResult<(StatusCode, Json<Resp<CreatedUser>>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    let id = UserDirectory::register(&mut tx, &input.name, &input.password).await?;
    tx.commit().await?;

    tracing::info!(user_id = id, name = %input.name, "User registered");
    Ok((StatusCode::CREATED, Json(Resp::data(CreatedUser { id }))))
}

/// GET /api/v1/user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserIdentity>> {
    let mut conn = state.pool.acquire().await?;
    let identity = UserDirectory::get_projection(&mut conn, id, &UserIdentity::projection())
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(identity))
}

/// PUT /api/v1/user/{id}
///
/// Replace a user's name and password. Administrator only.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UserRequest>,
) -> AppResult<Json<Resp>> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    let updated = UserDirectory::update_identity(&mut tx, id, &input.name, &input.password).await?;
    if updated == 0 {
        return Err(user_not_found(id));
    }
    tx.commit().await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User identity replaced");
    Ok(Json(Resp::ok()))
}

/// GET /api/v1/user/{id}/name
pub async fn get_user_name(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Resp<NamePayload>>> {
    let mut conn = state.pool.acquire().await?;
    let name = UserDirectory::get_projection(&mut conn, id, &name_column())
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(Resp::data(NamePayload { name })))
}

/// PATCH /api/v1/user/{id}/name
pub async fn set_user_name(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RenameRequest>,
) -> AppResult<Json<Resp>> {
    let mut tx = state.pool.begin().await?;
    let updated = UserDirectory::rename(&mut tx, id, &input.name).await?;
    if updated == 0 {
        return Err(user_not_found(id));
    }
    tx.commit().await?;

    tracing::info!(user_id = id, by = user.user_id, "User renamed");
    Ok(Json(Resp::ok()))
}

/// GET /api/v1/user/{id}/time
///
/// Creation and last-update times as epoch seconds.
pub async fn get_user_time(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Resp<UserTimes>>> {
    let mut conn = state.pool.acquire().await?;
    let times = UserDirectory::get_projection(&mut conn, id, &UserTimes::projection())
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(Resp::data(times)))
}

/// GET /api/v1/users
///
/// Every user without password hashes. Administrator only.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<Resp<UsersPayload>>> {
    let mut conn = state.pool.acquire().await?;
    let users = UserDirectory::list_all(&mut conn).await?;
    Ok(Json(Resp::data(UsersPayload { users })))
}
