//! Handler for the shared visit counter.

use axum::extract::State;
use serde::Serialize;
use userhub_db::repositories::CounterRepo;

use crate::error::AppResult;
use crate::extract::Json;
use crate::state::AppState;

/// Name of the counter row behind `GET /count`.
pub const VISIT_COUNTER: &str = "count";

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// GET /api/v1/count
///
/// Increment the shared counter and return its new value.
pub async fn count(State(state): State<AppState>) -> AppResult<Json<CountResponse>> {
    let count = CounterRepo::increment(&state.pool, VISIT_COUNTER).await?;
    Ok(Json(CountResponse { count }))
}
