use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::workout::WorkoutType;

/// A raw form value as the browser sends it: a JSON number or the text typed
/// into the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Parses the value as a float. Empty or non-numeric text yields `None`;
    /// the result may still be non-finite.
    pub fn parse(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Values read from the workout form on submit or save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type", default)]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub distance: FieldValue,
    #[serde(default)]
    pub duration: FieldValue,
    #[serde(default)]
    pub cadence: FieldValue,
    #[serde(default)]
    pub elevation: FieldValue,
}

impl FormInput {
    pub fn running(distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            workout_type: WorkoutType::Running,
            distance: distance.into(),
            duration: duration.into(),
            cadence: cadence.into(),
            elevation: FieldValue::default(),
        }
    }

    pub fn cycling(distance: f64, duration: f64, elevation: f64) -> Self {
        Self {
            workout_type: WorkoutType::Cycling,
            distance: distance.into(),
            duration: duration.into(),
            cadence: FieldValue::default(),
            elevation: elevation.into(),
        }
    }
}
