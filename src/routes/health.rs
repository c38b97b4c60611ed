use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let (map_ready, workouts) =
        state.with_session(|session| (session.map_handle().is_some(), session.workouts().len()))?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "map_ready": map_ready,
        "workouts": workouts
    })))
}
