use chrono::Utc;
use mapty_rs::collab::{FileStore, Store};
use mapty_rs::config::ValidationPolicy;
use mapty_rs::error::StoreError;
use mapty_rs::session::persist;
use mapty_rs::types::geo::Coords;
use mapty_rs::types::workout::Workout;

#[test]
fn file_store_reads_back_what_it_wrote() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileStore::new(dir.path().join("nested"));

    assert_eq!(store.read("workouts").expect("read"), None);

    store.write("workouts", "[1,2,3]").expect("write");
    assert_eq!(
        store.read("workouts").expect("read").as_deref(),
        Some("[1,2,3]")
    );

    store.write("workouts", "[]").expect("overwrite");
    assert_eq!(store.read("workouts").expect("read").as_deref(), Some("[]"));
}

#[test]
fn file_store_clear_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileStore::new(dir.path());

    store.write("workouts", "[]").expect("write");
    store.clear("workouts").expect("clear");
    store.clear("workouts").expect("clear again");

    assert_eq!(store.read("workouts").expect("read"), None);
    assert!(!dir.path().join("workouts.json").exists());
}

#[test]
fn file_store_rejects_keys_that_escape_its_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileStore::new(dir.path());

    let err = store.write("../outside", "[]").expect_err("invalid key");
    assert!(matches!(err, StoreError::InvalidKey(_)));
}

#[test]
fn persisted_collection_round_trips_through_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileStore::new(dir.path());
    let workouts = vec![
        Workout::running(Coords::new(40.0, -3.0), 5.0, 25.0, 180),
        Workout::cycling(Coords::new(41.25, -3.5), 27.0, 90.0, 420.0),
    ];

    persist::save(&mut store, "workouts", &workouts).expect("save");
    let loaded = persist::load(&store, "workouts", Utc::now(), ValidationPolicy::default());

    assert_eq!(loaded, workouts);
}
