use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use mapty_rs::config::ValidationPolicy;
use mapty_rs::error::ModelError;
use mapty_rs::types::geo::Coords;
use mapty_rs::types::workout::{
    Metric, StoredWorkout, Workout, WorkoutId, WorkoutKind, WorkoutType,
};

const STRICT: ValidationPolicy = ValidationPolicy {
    lenient_elevation: false,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn running_pace_is_duration_over_distance() {
    let workout = Workout::running(Coords::new(40.0, -3.0), 5.0, 25.0, 180);
    assert_eq!(workout.workout_type(), WorkoutType::Running);
    assert!(close(workout.pace().expect("pace"), 5.0));
    assert_eq!(workout.speed(), None);
    assert!(workout.description().starts_with("Running on "));
}

#[test]
fn cycling_speed_is_km_per_hour() {
    let workout = Workout::cycling(Coords::new(40.0, -3.0), 20.0, 45.0, 300.0);
    assert!(close(workout.speed().expect("speed"), 20.0 / 0.75));
    assert_eq!(workout.pace(), None);
    assert!(workout.description().starts_with("Cycling on "));
}

#[test]
fn description_uses_month_name_and_day() {
    let date = Utc.with_ymd_and_hms(2024, 10, 8, 9, 30, 0).unwrap();
    let workout = Workout::with_identity(
        WorkoutId::from("w1"),
        date,
        Coords::new(1.0, 2.0),
        3.0,
        20.0,
        Metric::Elevation(10.0),
    );
    assert_eq!(workout.description(), "Cycling on October 8");
}

#[test]
fn edit_recomputes_derived_metric_and_keeps_identity() {
    let mut workout = Workout::running(Coords::new(40.0, -3.0), 5.0, 25.0, 180);
    let id = workout.id().clone();
    let date = workout.date();

    workout
        .apply_edit(4.0, 30.0, Metric::Cadence(170))
        .expect("edit");

    assert_eq!(workout.id(), &id);
    assert_eq!(workout.date(), date);
    assert_eq!(workout.coords(), Coords::new(40.0, -3.0));
    assert_eq!(
        workout.kind(),
        &WorkoutKind::Running {
            cadence: 170,
            pace: 7.5
        }
    );
}

#[test]
fn edit_rejects_metric_of_other_type() {
    let mut workout = Workout::cycling(Coords::new(0.0, 0.0), 10.0, 30.0, 50.0);
    let err = workout
        .apply_edit(10.0, 30.0, Metric::Cadence(160))
        .expect_err("mismatch");
    assert_eq!(
        err,
        ModelError::MetricMismatch {
            expected: WorkoutType::Cycling,
            found: WorkoutType::Running
        }
    );
    assert_eq!(workout.metric(), Metric::Elevation(50.0));
}

#[test]
fn ids_created_in_the_same_millisecond_do_not_collide() {
    let now = Utc::now();
    assert_ne!(WorkoutId::generate(now), WorkoutId::generate(now));

    let ids: HashSet<WorkoutId> = (0..1000)
        .map(|_| Workout::running(Coords::new(0.0, 0.0), 1.0, 1.0, 1).id().clone())
        .collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn record_with_text_numbers_is_rebuilt() {
    let json = r#"{
        "id": "1700000000000",
        "coords": [51.5, -0.12],
        "distance": "5",
        "duration": "25",
        "type": "running",
        "date": "2023-11-14T22:13:20.000Z",
        "description": "stale",
        "clicks": 3,
        "cadence": "180",
        "pace": 99
    }"#;
    let record: StoredWorkout = serde_json::from_str(json).expect("record");
    let workout = Workout::from_record(record, Utc::now(), STRICT).expect("workout");

    assert_eq!(workout.id().as_str(), "1700000000000");
    assert_eq!(workout.coords(), Coords::new(51.5, -0.12));
    assert!(close(workout.pace().expect("pace"), 5.0));
    assert_eq!(workout.description(), "Running on November 14");
}

#[test]
fn record_without_id_or_date_gets_fresh_ones() {
    let json = r#"{"coords":[1,2],"distance":10,"duration":30,"type":"cycling","elevation":120}"#;
    let record: StoredWorkout = serde_json::from_str(json).expect("record");
    let loaded_at = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
    let workout = Workout::from_record(record, loaded_at, STRICT).expect("workout");

    assert_eq!(workout.date(), loaded_at);
    assert!(workout
        .id()
        .as_str()
        .starts_with(&loaded_at.timestamp_millis().to_string()));
    assert!(close(workout.speed().expect("speed"), 20.0));
}

#[test]
fn records_that_would_divide_by_zero_are_refused() {
    let zero_distance: StoredWorkout = serde_json::from_str(
        r#"{"coords":[1,2],"distance":0,"duration":30,"type":"running","cadence":170}"#,
    )
    .expect("record");
    assert!(Workout::from_record(zero_distance, Utc::now(), STRICT).is_none());

    let missing_metric: StoredWorkout = serde_json::from_str(
        r#"{"coords":[1,2],"distance":5,"duration":30,"type":"running"}"#,
    )
    .expect("record");
    assert!(Workout::from_record(missing_metric, Utc::now(), STRICT).is_none());
}

#[test]
fn stored_elevation_follows_the_validation_policy() {
    let json = r#"{"coords":[1,2],"distance":10,"duration":30,"type":"cycling","elevation":-50}"#;
    let lenient = ValidationPolicy {
        lenient_elevation: true,
    };

    let record: StoredWorkout = serde_json::from_str(json).expect("record");
    assert!(Workout::from_record(record.clone(), Utc::now(), STRICT).is_none());

    let workout = Workout::from_record(record, Utc::now(), lenient).expect("workout");
    assert_eq!(workout.metric(), Metric::Elevation(-50.0));
}

#[test]
fn stored_shape_carries_type_and_variant_fields() {
    let workout = Workout::running(Coords::new(40.0, -3.0), 5.0, 25.0, 180);
    let value = serde_json::to_value(StoredWorkout::from(&workout)).expect("json");

    assert_eq!(value["type"], "running");
    assert_eq!(value["coords"], serde_json::json!([40.0, -3.0]));
    assert_eq!(value["cadence"], 180.0);
    assert_eq!(value["pace"], 5.0);
    assert!(value.get("elevation").is_none());
    assert!(value.get("speed").is_none());
}
