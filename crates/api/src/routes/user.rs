use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// User routes, merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", post(user::create_user))
        .route("/user/{id}", get(user::get_user).put(user::update_user))
        .route(
            "/user/{id}/name",
            get(user::get_user_name).patch(user::set_user_name),
        )
        .route("/user/{id}/time", get(user::get_user_time))
        .route("/users", get(user::list_users))
}
