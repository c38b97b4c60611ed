//! Collaborators the session drives but does not own: the map widget, the
//! device geolocation, and the key-value blob store.

pub mod geo;
pub mod map;
pub mod store;

pub use geo::{Geolocation, ReportedPosition};
pub use map::{MapBackend, MapCommand, MapHandle, MarkerHandle, RecordingMap};
pub use store::{FileStore, MemoryStore, Store};
