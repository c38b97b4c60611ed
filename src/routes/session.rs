use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Deserialize;

use crate::collab::geo::ReportedPosition;
use crate::error::{AppError, GeolocationError};
use crate::session::SessionView;
use crate::state::AppState;
use crate::types::geo::Coords;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(snapshot))
        .route("/api/session/position", post(report_position))
        .route("/api/session/reset", post(reset))
}

/// What the browser's geolocation call produced.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PositionReport {
    lat: Option<f64>,
    lng: Option<f64>,
    error: Option<String>,
    #[serde(default)]
    denied: bool,
}

impl PositionReport {
    fn into_position(self) -> Result<ReportedPosition, AppError> {
        if self.denied {
            return Ok(ReportedPosition::failed(GeolocationError::PermissionDenied));
        }
        if let Some(reason) = self.error {
            return Ok(ReportedPosition::failed(GeolocationError::Unavailable(reason)));
        }
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let coords = Coords::new(lat, lng);
                if !coords.is_valid() {
                    return Err(AppError::BadRequest(format!(
                        "Invalid position: [{}, {}]",
                        lat, lng
                    )));
                }
                Ok(ReportedPosition::located(coords))
            }
            _ => Err(AppError::BadRequest(
                "Position needs lat and lng, or an error".to_string(),
            )),
        }
    }
}

async fn snapshot(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| session.view())?;
    Ok(Json(view))
}

async fn report_position(
    State(state): State<AppState>,
    Json(report): Json<PositionReport>,
) -> Result<Json<SessionView>, AppError> {
    let mut position = report.into_position()?;
    let view = state.with_session(|session| {
        session.initialize(&mut position)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| {
        session.reset()?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}
