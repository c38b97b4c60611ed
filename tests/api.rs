use axum::{body::to_bytes, http::Request, Router};
use mapty_rs::{
    collab::{MemoryStore, Store},
    config::Config,
    routes,
    state::AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(store: &MemoryStore) -> Router {
    let state = AppState::with_store(Config::default(), Box::new(store.clone()));
    Router::new()
        .merge(routes::session::router())
        .merge(routes::map::router())
        .merge(routes::form::router())
        .merge(routes::workouts::router())
        .with_state(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (u16, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string())),
        None => builder.body(axum::body::Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

async fn located_app(store: &MemoryStore) -> Router {
    let app = app(store);
    let (status, view) = send(
        &app,
        "POST",
        "/api/session/position",
        Some(json!({ "lat": 40.0, "lng": -3.0 })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(view["map_ready"], true);
    app
}

async fn create_run(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/map/click",
        Some(json!({ "lat": 40.0, "lng": -3.0 })),
    )
    .await;
    assert_eq!(status, 200);
    let (status, view) = send(
        app,
        "POST",
        "/api/workouts",
        Some(json!({
            "type": "running",
            "distance": "5",
            "duration": "25",
            "cadence": "180",
            "elevation": ""
        })),
    )
    .await;
    assert_eq!(status, 200);
    let workouts = view["workouts"].as_array().expect("workouts");
    workouts[workouts.len() - 1]["id"]
        .as_str()
        .expect("id")
        .to_string()
}

#[tokio::test]
async fn position_report_creates_the_map_once() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;

    let (status, commands) = send(&app, "GET", "/api/map/commands", None).await;
    assert_eq!(status, 200);
    let ops: Vec<&str> = commands
        .as_array()
        .expect("commands")
        .iter()
        .filter_map(|c| c["op"].as_str())
        .collect();
    assert_eq!(ops, ["create_map", "add_tile_layer", "subscribe_clicks"]);
    assert_eq!(commands[0]["center"], json!([40.0, -3.0]));
    assert_eq!(commands[0]["zoom"], 13);

    let (_, drained) = send(&app, "GET", "/api/map/commands", None).await;
    assert_eq!(drained, json!([]));
}

#[tokio::test]
async fn denied_position_surfaces_the_banner() {
    let store = MemoryStore::new();
    let app = app(&store);

    let (status, body) = send(
        &app,
        "POST",
        "/api/session/position",
        Some(json!({ "denied": true })),
    )
    .await;
    assert_eq!(status, 503);
    assert_eq!(body["error"], "Could not get your position!");

    let (_, view) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(view["map_ready"], false);
    assert_eq!(view["banner"], "Could not get your position!");
}

#[tokio::test]
async fn invalid_position_is_a_bad_request() {
    let store = MemoryStore::new();
    let (status, _) = send(
        &app(&store),
        "POST",
        "/api/session/position",
        Some(json!({ "lat": 123.0, "lng": 0.0 })),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn submitting_a_workout_renders_and_persists_it() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;
    let id = create_run(&app).await;

    let (_, view) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(view["workouts"].as_array().expect("workouts").len(), 1);
    assert!(view["workouts"][0]["html"]
        .as_str()
        .expect("html")
        .contains("5.0</span>"));
    assert_eq!(view["form"]["visible"], false);

    let blob = store.read("workouts").expect("read").expect("blob");
    let records: Value = serde_json::from_str(&blob).expect("json");
    assert_eq!(records[0]["id"], id.as_str());
    assert_eq!(records[0]["type"], "running");
}

#[tokio::test]
async fn invalid_submission_is_rejected() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;
    send(
        &app,
        "POST",
        "/api/map/click",
        Some(json!({ "lat": 40.0, "lng": -3.0 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/workouts",
        Some(json!({ "type": "running", "distance": 0, "duration": 25, "cadence": 180 })),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Inputs have to be positive numbers!");
    assert_eq!(store.read("workouts").expect("read"), None);
}

#[tokio::test]
async fn edit_flow_updates_the_entry_in_place() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;
    let id = create_run(&app).await;

    let (status, view) = send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;
    assert_eq!(status, 200);
    assert_eq!(view["mode"], json!({ "state": "editing", "id": id.as_str() }));
    assert_eq!(view["form"]["type_locked"], true);
    assert_eq!(view["form"]["fields"]["distance"], "5");

    let (status, _) = send(&app, "DELETE", &format!("/api/workouts/{id}"), None).await;
    assert_eq!(status, 409);

    let (status, view) = send(
        &app,
        "POST",
        "/api/edit/save",
        Some(json!({ "distance": "10", "duration": "50", "cadence": "180" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(view["mode"]["state"], "creating");
    assert_eq!(view["workouts"].as_array().expect("workouts").len(), 1);
    assert_eq!(view["workouts"][0]["id"], id.as_str());
    assert!(view["workouts"][0]["html"]
        .as_str()
        .expect("html")
        .contains(r#"<span class="workout__value">10</span>"#));
}

#[tokio::test]
async fn delete_and_recenter_follow_the_collection() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;

    let (status, body) = send(&app, "POST", "/api/workouts/recenter", None).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "No added workouts to recenter around");

    let id = create_run(&app).await;
    let (status, _) = send(&app, "POST", "/api/workouts/recenter", None).await;
    assert_eq!(status, 200);

    let (status, _) = send(&app, "POST", "/api/workouts/unknown/select", None).await;
    assert_eq!(status, 404);

    let (status, view) = send(&app, "DELETE", &format!("/api/workouts/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(view["workouts"], json!([]));

    let (status, view) = send(&app, "DELETE", "/api/workouts/missing", None).await;
    assert_eq!(status, 200);
    assert_eq!(view["workouts"], json!([]));
}

#[tokio::test]
async fn reset_forgets_everything() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;
    create_run(&app).await;
    create_run(&app).await;

    let (status, view) = send(&app, "DELETE", "/api/workouts", None).await;
    assert_eq!(status, 200);
    assert_eq!(view["workouts"], json!([]));

    create_run(&app).await;
    let (status, view) = send(&app, "POST", "/api/session/reset", None).await;
    assert_eq!(status, 200);
    assert_eq!(view["map_ready"], false);
    assert_eq!(view["workouts"], json!([]));
    assert_eq!(store.read("workouts").expect("read"), None);
}

#[tokio::test]
async fn edit_form_state_holds_across_refreshes_and_failed_saves() {
    let store = MemoryStore::new();
    let app = located_app(&store).await;
    let id = create_run(&app).await;

    let (_, editing) = send(&app, "POST", &format!("/api/workouts/{id}/edit"), None).await;
    let (_, refreshed) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(refreshed["mode"], editing["mode"]);
    assert_eq!(refreshed["form"]["visible"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/edit/save",
        Some(json!({ "distance": "-1", "duration": "50", "cadence": "180" })),
    )
    .await;
    assert_eq!(status, 400);

    let (_, after) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(after["mode"], editing["mode"]);
    assert_eq!(after["form"]["visible"], true);
    assert_eq!(after["form"]["edit_controls_visible"], true);
}
