//! Markup for the workout list and marker popups.

use crate::collab::map::Popup;
use crate::types::workout::{Workout, WorkoutKind};

/// The `<li>` entry shown in the workout list.
pub fn workout_entry(workout: &Workout) -> String {
    let workout_type = workout.workout_type();
    let id = escape_html(workout.id().as_str());

    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{title}</h2>
  <div class="workout__details__distance">
    <span class="workout__icon">{emoji}</span>
    <span class="workout__value">{distance}</span>
    <span class="workout__unit">km</span>
  </div>
  <div class="workout__details__duration">
    <span class="workout__icon">⏱</span>
    <span class="workout__value">{duration}</span>
    <span class="workout__unit">min</span>
  </div>
"#,
        kind = workout_type.as_str(),
        title = escape_html(workout.description()),
        emoji = workout_type.emoji(),
        distance = workout.distance(),
        duration = workout.duration(),
    );

    match workout.kind() {
        WorkoutKind::Running { cadence, pace } => html.push_str(&format!(
            r#"  <div class="workout__details__pace">
    <span class="workout__icon">⚡️</span>
    <span class="workout__value">{pace:.1}</span>
    <span class="workout__unit">min/km</span>
  </div>
  <div class="workout__details__cadence">
    <span class="workout__icon">🦶🏼</span>
    <span class="workout__value">{cadence}</span>
    <span class="workout__unit">spm</span>
  </div>
"#
        )),
        WorkoutKind::Cycling { elevation, speed } => html.push_str(&format!(
            r#"  <div class="workout__details__speed">
    <span class="workout__icon">⚡️</span>
    <span class="workout__value">{speed:.1}</span>
    <span class="workout__unit">km/h</span>
  </div>
  <div class="workout__details__elevation">
    <span class="workout__icon">⛰</span>
    <span class="workout__value">{elevation}</span>
    <span class="workout__unit">m</span>
  </div>
"#
        )),
    }

    html.push_str(&format!(
        r##"  <a href="#" data-id="{id}" class="workout__delete"> DELETE </a>
  <a href="#" data-id="{id}" class="workout__edit"> EDIT </a>
</li>"##
    ));
    html
}

/// The popup bound to a workout's marker.
pub fn popup(workout: &Workout) -> Popup {
    let workout_type = workout.workout_type();
    Popup {
        content: format!(
            "{} {}",
            workout_type.emoji(),
            escape_html(workout.description())
        ),
        class_name: format!("{}-popup", workout_type.as_str()),
        max_width: 250,
        min_width: 100,
        auto_close: false,
        close_on_click: false,
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
