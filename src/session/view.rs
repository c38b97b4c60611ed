use std::time::Instant;

use serde::Serialize;

use crate::render;
use crate::session::mode::Mode;
use crate::types::geo::Coords;
use crate::types::workout::{Metric, Workout, WorkoutId, WorkoutType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormFields {
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl FormFields {
    fn from_workout(workout: &Workout) -> Self {
        let (cadence, elevation) = match workout.metric() {
            Metric::Cadence(cadence) => (cadence.to_string(), String::new()),
            Metric::Elevation(elevation) => (String::new(), elevation.to_string()),
        };
        Self {
            distance: workout.distance().to_string(),
            duration: workout.duration().to_string(),
            cadence,
            elevation,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState {
    pub visible: bool,
    pub workout_type: WorkoutType,
    pub type_locked: bool,
    pub edit_controls_visible: bool,
    pub fields: FormFields,
    pub pending_location: Option<Coords>,
    /// Set right after hiding, so the closing form does not animate.
    pub display_suppressed: bool,
    #[serde(skip)]
    suppressed_until: Option<Instant>,
}

impl FormState {
    /// Which metric row (`cadence` or `elevation`) is visible.
    pub fn metric_field(&self) -> &'static str {
        self.workout_type.metric_field()
    }

    pub(crate) fn show_for_create(&mut self, at: Coords) {
        self.visible = true;
        self.pending_location = Some(at);
    }

    pub(crate) fn show_for_edit(&mut self, workout: &Workout) {
        self.visible = true;
        self.workout_type = workout.workout_type();
        self.type_locked = true;
        self.edit_controls_visible = true;
        self.fields = FormFields::from_workout(workout);
    }

    pub(crate) fn hide(&mut self, now: Instant, reset_delay: std::time::Duration) {
        self.visible = false;
        self.type_locked = false;
        self.edit_controls_visible = false;
        self.fields = FormFields::default();
        self.pending_location = None;
        self.display_suppressed = true;
        self.suppressed_until = Some(now + reset_delay);
    }

    pub(crate) fn tick(&mut self, now: Instant) {
        if self.suppressed_until.is_some_and(|until| now >= until) {
            self.display_suppressed = false;
            self.suppressed_until = None;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Banner {
    message: String,
    expires_at: Instant,
}

impl Banner {
    pub fn new(message: String, expires_at: Instant) -> Self {
        Self {
            message,
            expires_at,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub id: WorkoutId,
    pub html: String,
}

impl ListEntry {
    pub fn render(workout: &Workout) -> Self {
        Self {
            id: workout.id().clone(),
            html: render::workout_entry(workout),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutList {
    entries: Vec<ListEntry>,
}

impl WorkoutList {
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &WorkoutId) -> Option<&ListEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub(crate) fn push(&mut self, entry: ListEntry) {
        self.entries.push(entry);
    }

    /// Swaps the entry for `entry.id` in place. Returns false if absent.
    pub(crate) fn replace(&mut self, entry: ListEntry) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: &WorkoutId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub mode: Mode,
    pub map_ready: bool,
    pub form: FormState,
    pub metric_field: &'static str,
    pub workouts: Vec<ListEntry>,
    pub banner: Option<String>,
}
