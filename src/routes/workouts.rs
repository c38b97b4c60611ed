use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use crate::error::AppError;
use crate::session::SessionView;
use crate::state::AppState;
use crate::types::form::FormInput;
use crate::types::workout::WorkoutId;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workouts", post(submit).delete(delete_all))
        .route("/api/workouts/recenter", post(recenter))
        .route("/api/workouts/:id", axum::routing::delete(delete))
        .route("/api/workouts/:id/select", post(select))
        .route("/api/workouts/:id/edit", post(begin_edit))
}

async fn submit(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| {
        session.submit(input)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn delete_all(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| {
        let removed = session.delete_all()?;
        tracing::info!("Deleted all workouts ({} removed)", removed);
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn recenter(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let view = state.with_session(|session| {
        session.recenter()?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let id = WorkoutId::from(id);
    let view = state.with_session(|session| {
        session.delete(&id)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn select(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let id = WorkoutId::from(id);
    let view = state.with_session(|session| {
        session.select(&id)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}

async fn begin_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let id = WorkoutId::from(id);
    let view = state.with_session(|session| {
        session.begin_edit(&id)?;
        Ok::<_, AppError>(session.view())
    })??;
    Ok(Json(view))
}
