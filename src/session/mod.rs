//! The session controller and the state it keeps in sync: the workout
//! collection, the map markers, the rendered list, and the persisted blob.

mod controller;
pub mod mode;
pub mod persist;
pub mod validate;
pub mod view;

pub use controller::Session;
pub use mode::Mode;
pub use view::SessionView;
