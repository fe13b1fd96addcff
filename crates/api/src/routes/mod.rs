pub mod auth;
pub mod counter;
pub mod health;
pub mod hello;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /user                  POST register
/// /login                 POST form login -> bearer token
/// /user/{id}             GET identity, PUT full replace (admin)
/// /user/{id}/name        GET, PATCH
/// /user/{id}/time        GET epoch-second timestamps
/// /users                 GET listing (admin)
/// /count                 GET increment shared counter
/// /hello                 GET greet caller (auth)
/// /hello/{name}          GET greet by name
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(user::router())
        .merge(auth::router())
        .merge(counter::router())
        .merge(hello::router())
}
