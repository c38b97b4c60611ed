use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::session::SessionView;
use crate::state::AppState;
use crate::types::form::FormInput;
use crate::types::workout::WorkoutType;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/form/type", post(select_type))
        .route("/api/edit/save", post(save_edit))
        .route("/api/edit/discard", post(discard_edit))
}

#[derive(Debug, Deserialize)]
struct TypeSelection {
    #[serde(rename = "type")]
    workout_type: String,
}

async fn select_type(
    State(state): State<AppState>,
    Json(selection): Json<TypeSelection>,
) -> Result<Json<SessionView>, AppError> {
    let workout_type = WorkoutType::from_str(&selection.workout_type).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown workout type: {}", selection.workout_type))
    })?;
    let view = state.with_session(|session| {
        session.select_type(workout_type)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn save_edit(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| {
        session.save_edit(input)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn discard_edit(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| {
        session.discard_edit()?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}
