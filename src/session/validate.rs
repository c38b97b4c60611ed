use crate::config::ValidationPolicy;
use crate::error::SessionError;
use crate::types::form::{FieldValue, FormInput};
use crate::types::workout::{Metric, WorkoutType};

/// Form values that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedInput {
    pub distance: f64,
    pub duration: f64,
    pub metric: Metric,
}

/// Checks the fields `workout_type` needs. Distance, duration and cadence
/// must be finite and positive; elevation must be finite, and positive unless
/// the policy is lenient.
pub fn validate(
    input: &FormInput,
    workout_type: WorkoutType,
    policy: ValidationPolicy,
) -> Result<ValidatedInput, SessionError> {
    let distance = positive(&input.distance, "distance")?;
    let duration = positive(&input.duration, "duration")?;

    let metric = match workout_type {
        WorkoutType::Running => {
            let cadence = positive(&input.cadence, "cadence")?.trunc();
            if cadence < 1.0 || cadence > f64::from(u32::MAX) {
                return Err(SessionError::Validation { field: "cadence" });
            }
            Metric::Cadence(cadence as u32)
        }
        WorkoutType::Cycling => {
            let elevation = if policy.lenient_elevation {
                finite(&input.elevation, "elevation")?
            } else {
                positive(&input.elevation, "elevation")?
            };
            Metric::Elevation(elevation)
        }
    };

    Ok(ValidatedInput {
        distance,
        duration,
        metric,
    })
}

fn finite(value: &FieldValue, field: &'static str) -> Result<f64, SessionError> {
    value
        .parse()
        .filter(|v| v.is_finite())
        .ok_or(SessionError::Validation { field })
}

fn positive(value: &FieldValue, field: &'static str) -> Result<f64, SessionError> {
    let v = finite(value, field)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(SessionError::Validation { field })
    }
}
