use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::config::ValidationPolicy;
use crate::error::ModelError;
use crate::types::form::FieldValue;
use crate::types::geo::Coords;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Creation millis plus a random suffix, so ids minted in the same
    /// millisecond stay distinct.
    pub fn generate(created_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}",
            created_at.timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkoutId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkoutId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "running" => Some(WorkoutType::Running),
            "cycling" => Some(WorkoutType::Cycling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    pub fn capitalized(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }

    pub fn metric_field(&self) -> &'static str {
        match self {
            WorkoutType::Running => "cadence",
            WorkoutType::Cycling => "elevation",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Cadence(u32),
    Elevation(f64),
}

impl Metric {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            Metric::Cadence(_) => WorkoutType::Running,
            Metric::Elevation(_) => WorkoutType::Cycling,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutKind {
    Running { cadence: u32, pace: f64 },
    Cycling { elevation: f64, speed: f64 },
}

impl WorkoutKind {
    fn derive(metric: Metric, distance: f64, duration: f64) -> Self {
        match metric {
            Metric::Cadence(cadence) => WorkoutKind::Running {
                cadence,
                pace: pace(distance, duration),
            },
            Metric::Elevation(elevation) => WorkoutKind::Cycling {
                elevation,
                speed: speed(distance, duration),
            },
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            WorkoutKind::Running { cadence, .. } => Metric::Cadence(*cadence),
            WorkoutKind::Cycling { elevation, .. } => Metric::Elevation(*elevation),
        }
    }
}

fn pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

fn speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// Fields are private so distance, duration and the metric can only change
/// through [`Workout::apply_edit`], which keeps `pace`/`speed` current.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    coords: Coords,
    distance: f64,
    duration: f64,
    date: DateTime<Utc>,
    description: String,
    kind: WorkoutKind,
}

impl Workout {
    pub fn new(coords: Coords, distance: f64, duration: f64, metric: Metric) -> Self {
        let date = Utc::now();
        Self::with_identity(
            WorkoutId::generate(date),
            date,
            coords,
            distance,
            duration,
            metric,
        )
    }

    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: u32) -> Self {
        Self::new(coords, distance, duration, Metric::Cadence(cadence))
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation: f64) -> Self {
        Self::new(coords, distance, duration, Metric::Elevation(elevation))
    }

    pub fn with_identity(
        id: WorkoutId,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        metric: Metric,
    ) -> Self {
        let kind = WorkoutKind::derive(metric, distance, duration);
        let description = describe(kind.workout_type(), date);
        Self {
            id,
            coords,
            distance,
            duration,
            date,
            description,
            kind,
        }
    }

    /// Rebuilds a workout from a persisted record, re-running derivation.
    ///
    /// Returns `None` when the record lacks its type's metric or carries
    /// values the form would have refused under `policy`.
    pub fn from_record(
        record: StoredWorkout,
        loaded_at: DateTime<Utc>,
        policy: ValidationPolicy,
    ) -> Option<Self> {
        if !is_positive(record.distance) || !is_positive(record.duration) {
            return None;
        }
        let metric = match record.workout_type {
            WorkoutType::Running => Metric::Cadence(cadence_from(record.cadence?)?),
            WorkoutType::Cycling => {
                let elevation = record.elevation?;
                let accepted = if policy.lenient_elevation {
                    elevation.is_finite()
                } else {
                    is_positive(elevation)
                };
                if !accepted {
                    return None;
                }
                Metric::Elevation(elevation)
            }
        };
        let date = record.date.unwrap_or(loaded_at);
        let id = record.id.unwrap_or_else(|| WorkoutId::generate(loaded_at));
        Some(Self::with_identity(
            id,
            date,
            record.coords,
            record.distance,
            record.duration,
            metric,
        ))
    }

    /// Replaces distance, duration and the metric, keeping id, coordinates
    /// and date, and recomputes every derived field.
    pub fn apply_edit(
        &mut self,
        distance: f64,
        duration: f64,
        metric: Metric,
    ) -> Result<(), ModelError> {
        let expected = self.workout_type();
        if metric.workout_type() != expected {
            return Err(ModelError::MetricMismatch {
                expected,
                found: metric.workout_type(),
            });
        }
        self.distance = distance;
        self.duration = duration;
        self.kind = WorkoutKind::derive(metric, distance, duration);
        self.description = describe(expected, self.date);
        Ok(())
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn metric(&self) -> Metric {
        self.kind.metric()
    }

    pub fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }
}

fn describe(workout_type: WorkoutType, date: DateTime<Utc>) -> String {
    format!(
        "{} on {}",
        workout_type.capitalized(),
        date.format("%B %-d")
    )
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn cadence_from(value: f64) -> Option<u32> {
    let steps = value.trunc();
    (steps.is_finite() && steps >= 1.0 && steps <= f64::from(u32::MAX)).then_some(steps as u32)
}

/// The persisted shape of a workout.
///
/// Numeric fields accept numbers or numeric strings, since older snapshots
/// stored raw form values. Derived fields are written for readers of the
/// blob but ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWorkout {
    #[serde(default)]
    pub id: Option<WorkoutId>,
    pub coords: Coords,
    #[serde(deserialize_with = "lenient_number")]
    pub distance: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub duration: f64,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cadence: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for StoredWorkout {
    fn from(workout: &Workout) -> Self {
        let (cadence, elevation, pace, speed) = match workout.kind {
            WorkoutKind::Running { cadence, pace } => {
                (Some(f64::from(cadence)), None, Some(pace), None)
            }
            WorkoutKind::Cycling { elevation, speed } => {
                (None, Some(elevation), None, Some(speed))
            }
        };
        Self {
            id: Some(workout.id.clone()),
            coords: workout.coords,
            distance: workout.distance,
            duration: workout.duration,
            workout_type: workout.workout_type(),
            date: Some(workout.date),
            description: Some(workout.description.clone()),
            cadence,
            elevation,
            pace,
            speed,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = FieldValue::deserialize(deserializer)?;
    value
        .parse()
        .ok_or_else(|| serde::de::Error::custom(format!("not a number: {value}")))
}

fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FieldValue>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.parse()))
}
