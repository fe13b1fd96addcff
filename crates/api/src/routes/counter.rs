use axum::routing::get;
use axum::Router;

use crate::handlers::counter;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/count", get(counter::count))
}
