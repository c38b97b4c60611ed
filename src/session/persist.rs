use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::collab::store::Store;
use crate::config::ValidationPolicy;
use crate::error::StoreError;
use crate::types::workout::{StoredWorkout, Workout};

/// Reads the workout collection stored under `key`.
///
/// Missing, unreadable or corrupt data yields an empty collection. Records
/// that cannot be rebuilt under `policy` are dropped individually, and
/// duplicate ids get a fresh one.
pub fn load(
    store: &dyn Store,
    key: &str,
    loaded_at: DateTime<Utc>,
    policy: ValidationPolicy,
) -> Vec<Workout> {
    let blob = match store.read(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!("Could not read saved workouts: {}", err);
            return Vec::new();
        }
    };

    let records: Vec<Value> = match serde_json::from_str(&blob) {
        Ok(Value::Array(records)) => records,
        Ok(_) | Err(_) => {
            tracing::warn!("Saved workouts under '{}' are corrupt, starting empty", key);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut workouts = Vec::with_capacity(records.len());
    for (index, value) in records.into_iter().enumerate() {
        let mut record = match serde_json::from_value::<StoredWorkout>(value) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("Dropping saved workout #{}: {}", index, err);
                continue;
            }
        };
        if record.id.as_ref().is_some_and(|id| seen.contains(id)) {
            tracing::warn!("Saved workout #{} repeats an id, assigning a new one", index);
            record.id = None;
        }
        match Workout::from_record(record, loaded_at, policy) {
            Some(workout) => {
                seen.insert(workout.id().clone());
                workouts.push(workout);
            }
            None => tracing::warn!("Dropping saved workout #{}: invalid values", index),
        }
    }
    workouts
}

/// Overwrites the blob under `key` with the whole collection.
pub fn save(store: &mut dyn Store, key: &str, workouts: &[Workout]) -> Result<(), StoreError> {
    let records: Vec<StoredWorkout> = workouts.iter().map(StoredWorkout::from).collect();
    let blob = serde_json::to_string(&records)?;
    store.write(key, &blob)
}
