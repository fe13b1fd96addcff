use axum::routing::get;
use axum::Router;

use crate::handlers::hello;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello::hello_me))
        .route("/hello/{name}", get(hello::hello))
}
