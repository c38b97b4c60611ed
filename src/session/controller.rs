use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;

use crate::collab::geo::Geolocation;
use crate::collab::map::{MapBackend, MapHandle, MarkerHandle, ViewOptions};
use crate::collab::store::Store;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::render;
use crate::session::mode::Mode;
use crate::session::persist;
use crate::session::validate::validate;
use crate::session::view::{Banner, FormState, ListEntry, SessionView, WorkoutList};
use crate::types::form::FormInput;
use crate::types::geo::Coords;
use crate::types::workout::{Workout, WorkoutId, WorkoutType};

/// Owns the workout collection and keeps the map markers, the rendered list
/// and the persisted blob in step with it.
pub struct Session<M: MapBackend> {
    config: SessionConfig,
    map_backend: M,
    store: Box<dyn Store>,
    map: Option<MapHandle>,
    workouts: Vec<Workout>,
    markers: HashMap<WorkoutId, MarkerHandle>,
    list: WorkoutList,
    form: FormState,
    mode: Mode,
    banner: Option<Banner>,
}

impl<M: MapBackend> Session<M> {
    pub fn new(config: SessionConfig, map_backend: M, store: Box<dyn Store>) -> Self {
        let mut session = Self {
            config,
            map_backend,
            store,
            map: None,
            workouts: Vec::new(),
            markers: HashMap::new(),
            list: WorkoutList::default(),
            form: FormState::default(),
            mode: Mode::default(),
            banner: None,
        };
        session.hydrate();
        session
    }

    fn hydrate(&mut self) {
        let workouts = persist::load(
            self.store.as_ref(),
            &self.config.storage_key,
            Utc::now(),
            self.config.validation,
        );
        for workout in workouts {
            self.list.push(ListEntry::render(&workout));
            self.workouts.push(workout);
        }
        tracing::info!("Restored {} saved workouts", self.workouts.len());
    }

    /// Resolves the device position and builds the map there, then places a
    /// marker for every workout. A previous map, if any, is removed first.
    pub fn initialize(&mut self, geolocation: &mut dyn Geolocation) -> Result<(), SessionError> {
        if let Some(map) = self.map.take() {
            self.markers.clear();
            self.map_backend.remove_map(map);
        }

        let center = match geolocation.request_current_position() {
            Ok(center) => center,
            Err(err) => {
                tracing::warn!("Geolocation failed: {}", err);
                return Err(self.fail(SessionError::Geolocation(err)));
            }
        };

        let map = self.map_backend.create_map(center, self.config.zoom);
        self.map_backend.add_tile_layer(map, &self.config.tile_layer);
        self.map_backend.subscribe_clicks(map);
        self.map = Some(map);

        for workout in &self.workouts {
            let marker = place_marker(&mut self.map_backend, map, workout);
            self.markers.insert(workout.id().clone(), marker);
        }

        tracing::info!(
            "Map ready at [{:.4}, {:.4}] with {} markers",
            center.lat,
            center.lng,
            self.markers.len()
        );
        Ok(())
    }

    pub fn open_form(&mut self, at: Coords) -> Result<(), SessionError> {
        if self.map.is_none() {
            return Err(self.fail(SessionError::MapUnavailable));
        }
        if self.mode.is_editing() {
            return Err(self.fail(SessionError::EditInProgress));
        }
        self.form.show_for_create(at);
        tracing::debug!("Form opened at [{}, {}]", at.lat, at.lng);
        Ok(())
    }

    pub fn select_type(&mut self, workout_type: WorkoutType) -> Result<(), SessionError> {
        if self.form.type_locked {
            return Err(self.fail(SessionError::EditInProgress));
        }
        self.form.workout_type = workout_type;
        Ok(())
    }

    pub fn submit(&mut self, input: FormInput) -> Result<WorkoutId, SessionError> {
        if self.mode.is_editing() {
            return Err(self.fail(SessionError::EditInProgress));
        }
        let Some(map) = self.map else {
            return Err(self.fail(SessionError::MapUnavailable));
        };
        let Some(at) = self.form.pending_location else {
            return Err(self.fail(SessionError::NoPendingLocation));
        };
        let valid = match validate(&input, input.workout_type, self.config.validation) {
            Ok(valid) => valid,
            Err(err) => return Err(self.fail(err)),
        };

        let workout = Workout::new(at, valid.distance, valid.duration, valid.metric);
        let id = workout.id().clone();

        let marker = place_marker(&mut self.map_backend, map, &workout);
        self.markers.insert(id.clone(), marker);
        self.list.push(ListEntry::render(&workout));
        tracing::info!("Created {} ({})", workout.description(), id);
        self.workouts.push(workout);

        self.form.hide(Instant::now(), self.config.form_reset_delay);
        self.persist();
        Ok(id)
    }

    pub fn recenter(&mut self) -> Result<(), SessionError> {
        if self.workouts.is_empty() {
            return Err(self.fail(SessionError::NoWorkouts));
        }
        let Some(map) = self.map else {
            return Err(self.fail(SessionError::MapUnavailable));
        };
        let bounds: Vec<Coords> = self.workouts.iter().map(Workout::coords).collect();
        self.map_backend.fit_bounds(map, &bounds);
        Ok(())
    }

    pub fn select(&mut self, id: &WorkoutId) -> Result<(), SessionError> {
        let Some(index) = self.position(id) else {
            return Err(self.fail(SessionError::UnknownWorkout(id.clone())));
        };
        let coords = self.workouts[index].coords();
        let Some(map) = self.map else {
            return Err(self.fail(SessionError::MapUnavailable));
        };
        self.map_backend.set_view(
            map,
            coords,
            self.config.zoom,
            ViewOptions {
                animate: true,
                pan_duration_secs: 1.0,
            },
        );
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &WorkoutId) -> Result<(), SessionError> {
        let Some(index) = self.position(id) else {
            return Err(self.fail(SessionError::UnknownWorkout(id.clone())));
        };
        if let Err(err) = self.mode.begin_edit(id.clone()) {
            return Err(self.fail(err));
        }
        self.form.show_for_edit(&self.workouts[index]);
        tracing::debug!("Editing {}", id);
        Ok(())
    }

    pub fn discard_edit(&mut self) -> Result<(), SessionError> {
        let id = match self.mode.finish_edit() {
            Ok(id) => id,
            Err(err) => return Err(self.fail(err)),
        };
        self.form.hide(Instant::now(), self.config.form_reset_delay);
        tracing::debug!("Discarded edit of {}", id);
        Ok(())
    }

    /// Applies the edited values to the workout in edit. On failure the edit
    /// stays open and nothing changes.
    pub fn save_edit(&mut self, input: FormInput) -> Result<(), SessionError> {
        let Some(id) = self.mode.editing_id().cloned() else {
            return Err(self.fail(SessionError::NotEditing));
        };
        let Some(index) = self.position(&id) else {
            return Err(self.fail(SessionError::UnknownWorkout(id)));
        };
        let workout_type = self.workouts[index].workout_type();
        let valid = match validate(&input, workout_type, self.config.validation) {
            Ok(valid) => valid,
            Err(err) => return Err(self.fail(err)),
        };

        if let Err(err) =
            self.workouts[index].apply_edit(valid.distance, valid.duration, valid.metric)
        {
            return Err(self.fail(err.into()));
        }
        self.list.replace(ListEntry::render(&self.workouts[index]));
        tracing::info!("Updated {} ({})", self.workouts[index].description(), id);

        self.persist();
        self.form.hide(Instant::now(), self.config.form_reset_delay);
        self.mode.finish_edit()?;
        Ok(())
    }

    /// Removes one workout with its marker and list entry. Returns whether
    /// anything was removed; unknown ids are a no-op.
    pub fn delete(&mut self, id: &WorkoutId) -> Result<bool, SessionError> {
        if self.mode.is_editing() {
            return Err(self.fail(SessionError::DeleteWhileEditing));
        }
        let Some(index) = self.position(id) else {
            tracing::debug!("Delete of unknown workout {} ignored", id);
            return Ok(false);
        };

        let workout = self.workouts.remove(index);
        if let Some(marker) = self.markers.remove(id) {
            if let Some(map) = self.map {
                self.map_backend.remove_layer(map, marker);
            }
        }
        self.list.remove(id);
        tracing::info!("Deleted {} ({})", workout.description(), id);

        self.persist();
        Ok(true)
    }

    pub fn delete_all(&mut self) -> Result<usize, SessionError> {
        if self.mode.is_editing() {
            return Err(self.fail(SessionError::DeleteWhileEditing));
        }
        let ids: Vec<WorkoutId> = self.list.entries().iter().map(|e| e.id.clone()).collect();
        let mut removed = 0;
        for id in &ids {
            if self.delete(id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Clears the saved workouts and returns to a fresh, map-less session.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if let Err(err) = self.store.clear(&self.config.storage_key) {
            tracing::warn!("Could not clear saved workouts: {}", err);
            return Err(self.fail(err.into()));
        }
        if let Some(map) = self.map.take() {
            for (_, marker) in self.markers.drain() {
                self.map_backend.remove_layer(map, marker);
            }
            self.map_backend.remove_map(map);
        }
        self.markers.clear();
        self.workouts.clear();
        self.list.clear();
        self.form = FormState::default();
        self.mode = Mode::Creating;
        self.banner = None;
        tracing::info!("Session reset");
        Ok(())
    }

    pub fn tick(&mut self, now: Instant) {
        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.banner = None;
        }
        self.form.tick(now);
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            mode: self.mode.clone(),
            map_ready: self.map.is_some(),
            form: self.form.clone(),
            metric_field: self.form.metric_field(),
            workouts: self.list.entries().to_vec(),
            banner: self.banner.as_ref().map(|b| b.message().to_string()),
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn workout(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn map_handle(&self) -> Option<MapHandle> {
        self.map
    }

    pub fn marker_for(&self, id: &WorkoutId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn list(&self) -> &WorkoutList {
        &self.list
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_ref().map(Banner::message)
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn map_backend(&self) -> &M {
        &self.map_backend
    }

    pub fn map_backend_mut(&mut self) -> &mut M {
        &mut self.map_backend
    }

    fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }

    fn persist(&mut self) {
        if let Err(err) = persist::save(
            self.store.as_mut(),
            &self.config.storage_key,
            &self.workouts,
        ) {
            tracing::warn!("Could not save workouts: {}", err);
            self.fail(SessionError::Store(err));
        }
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        tracing::debug!("Session error: {}", err);
        self.banner = Some(Banner::new(
            err.to_string(),
            Instant::now() + self.config.banner_ttl,
        ));
        err
    }
}

fn place_marker<M: MapBackend>(backend: &mut M, map: MapHandle, workout: &Workout) -> MarkerHandle {
    let marker = backend.add_marker(map, workout.coords());
    backend.bind_popup(marker, &render::popup(workout));
    marker
}
