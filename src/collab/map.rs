use serde::{Deserialize, Serialize};

use crate::types::geo::Coords;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            max_zoom: 19,
            attribution:
                "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub animate: bool,
    pub pan_duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

/// The interactive map widget.
///
/// Clicks are not delivered through callbacks: `subscribe_clicks` asks the
/// widget to report them, and the host turns each report into a call to
/// `Session::open_form`.
pub trait MapBackend: Send {
    fn create_map(&mut self, center: Coords, zoom: u8) -> MapHandle;
    fn add_tile_layer(&mut self, map: MapHandle, layer: &TileLayer);
    fn set_view(&mut self, map: MapHandle, center: Coords, zoom: u8, options: ViewOptions);
    fn fit_bounds(&mut self, map: MapHandle, bounds: &[Coords]);
    fn subscribe_clicks(&mut self, map: MapHandle);
    fn add_marker(&mut self, map: MapHandle, at: Coords) -> MarkerHandle;
    fn bind_popup(&mut self, marker: MarkerHandle, popup: &Popup);
    fn remove_layer(&mut self, map: MapHandle, marker: MarkerHandle);
    fn remove_map(&mut self, map: MapHandle);
}

/// One recorded `MapBackend` call, replayed by the browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand {
    CreateMap {
        map: MapHandle,
        center: Coords,
        zoom: u8,
    },
    AddTileLayer {
        map: MapHandle,
        layer: TileLayer,
    },
    SetView {
        map: MapHandle,
        center: Coords,
        zoom: u8,
        options: ViewOptions,
    },
    FitBounds {
        map: MapHandle,
        bounds: Vec<Coords>,
    },
    SubscribeClicks {
        map: MapHandle,
    },
    AddMarker {
        map: MapHandle,
        marker: MarkerHandle,
        at: Coords,
    },
    BindPopup {
        marker: MarkerHandle,
        popup: Popup,
    },
    RemoveLayer {
        map: MapHandle,
        marker: MarkerHandle,
    },
    RemoveMap {
        map: MapHandle,
    },
}

/// Queues map calls as [`MapCommand`]s until the client drains them.
///
/// The queue is compacted as it grows so it stays bounded by the number of
/// live markers even when nothing drains it: a viewport move replaces any
/// queued one, and removing a marker whose creation is still queued drops
/// both instead of queueing the removal.
#[derive(Debug, Default)]
pub struct RecordingMap {
    next_handle: u64,
    pending: Vec<MapCommand>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[MapCommand] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.pending)
    }

    fn move_viewport(&mut self, command: MapCommand) {
        self.pending.retain(|queued| {
            !matches!(
                queued,
                MapCommand::SetView { .. } | MapCommand::FitBounds { .. }
            )
        });
        self.pending.push(command);
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl MapBackend for RecordingMap {
    fn create_map(&mut self, center: Coords, zoom: u8) -> MapHandle {
        let map = MapHandle(self.next_handle());
        self.pending.push(MapCommand::CreateMap { map, center, zoom });
        map
    }

    fn add_tile_layer(&mut self, map: MapHandle, layer: &TileLayer) {
        self.pending.push(MapCommand::AddTileLayer {
            map,
            layer: layer.clone(),
        });
    }

    fn set_view(&mut self, map: MapHandle, center: Coords, zoom: u8, options: ViewOptions) {
        self.move_viewport(MapCommand::SetView {
            map,
            center,
            zoom,
            options,
        });
    }

    fn fit_bounds(&mut self, map: MapHandle, bounds: &[Coords]) {
        self.move_viewport(MapCommand::FitBounds {
            map,
            bounds: bounds.to_vec(),
        });
    }

    fn subscribe_clicks(&mut self, map: MapHandle) {
        self.pending.push(MapCommand::SubscribeClicks { map });
    }

    fn add_marker(&mut self, map: MapHandle, at: Coords) -> MarkerHandle {
        let marker = MarkerHandle(self.next_handle());
        self.pending.push(MapCommand::AddMarker { map, marker, at });
        marker
    }

    fn bind_popup(&mut self, marker: MarkerHandle, popup: &Popup) {
        self.pending.push(MapCommand::BindPopup {
            marker,
            popup: popup.clone(),
        });
    }

    fn remove_layer(&mut self, map: MapHandle, marker: MarkerHandle) {
        let undelivered = self.pending.iter().any(
            |queued| matches!(queued, MapCommand::AddMarker { marker: m, .. } if *m == marker),
        );
        if undelivered {
            self.pending.retain(|queued| match queued {
                MapCommand::AddMarker { marker: m, .. } | MapCommand::BindPopup { marker: m, .. } => {
                    *m != marker
                }
                _ => true,
            });
        } else {
            self.pending.push(MapCommand::RemoveLayer { map, marker });
        }
    }

    fn remove_map(&mut self, map: MapHandle) {
        // Anything still queued targets the map being removed.
        self.pending.clear();
        self.pending.push(MapCommand::RemoveMap { map });
    }
}
