pub mod form;
pub mod health;
pub mod map;
pub mod session;
pub mod workouts;
