//! Room entity.

pub mod model;

pub use model::Room;
