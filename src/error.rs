use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::types::workout::{WorkoutId, WorkoutType};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not serialize workouts: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{expected} workouts cannot take a {found} metric")]
    MetricMismatch {
        expected: WorkoutType,
        found: WorkoutType,
    },
}

/// Failures of a session operation. The display text is what the error
/// banner shows.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Inputs have to be positive numbers!")]
    Validation { field: &'static str },
    #[error("Could not get your position!")]
    Geolocation(#[source] GeolocationError),
    #[error("Finish editing the current workout first!")]
    EditInProgress,
    #[error("Can not delete while editing!")]
    DeleteWhileEditing,
    #[error("No workout is being edited")]
    NotEditing,
    #[error("No added workouts to recenter around")]
    NoWorkouts,
    #[error("Click on the map to choose a location first!")]
    NoPendingLocation,
    #[error("The map is not available")]
    MapUnavailable,
    #[error("Workout not found: {0}")]
    UnknownWorkout(WorkoutId),
    #[error("Could not update saved workouts")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Session(err) => match err {
                SessionError::Validation { .. } | SessionError::NoPendingLocation => {
                    StatusCode::BAD_REQUEST
                }
                SessionError::UnknownWorkout(_) => StatusCode::NOT_FOUND,
                SessionError::EditInProgress
                | SessionError::DeleteWhileEditing
                | SessionError::NotEditing
                | SessionError::NoWorkouts => StatusCode::CONFLICT,
                SessionError::Geolocation(_) | SessionError::MapUnavailable => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                SessionError::Store(_) | SessionError::Model(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
