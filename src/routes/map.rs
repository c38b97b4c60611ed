use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Deserialize;

use crate::collab::map::MapCommand;
use crate::error::AppError;
use crate::session::SessionView;
use crate::state::AppState;
use crate::types::geo::Coords;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/map/commands", get(drain_commands))
        .route("/api/map/click", post(click))
}

#[derive(Debug, Deserialize)]
struct MapClick {
    lat: f64,
    lng: f64,
}

async fn drain_commands(State(state): State<AppState>) -> Result<Json<Vec<MapCommand>>, AppError> {
    let commands = state.with_session(|session| session.map_backend_mut().drain())?;
    Ok(Json(commands))
}

async fn click(
    State(state): State<AppState>,
    Json(click): Json<MapClick>,
) -> Result<Json<SessionView>, AppError> {
    let at = Coords::new(click.lat, click.lng);
    if !at.is_valid() {
        return Err(AppError::BadRequest(format!(
            "Invalid map location: [{}, {}]",
            click.lat, click.lng
        )));
    }
    let view = state.with_session(|session| {
        session.open_form(at)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}
