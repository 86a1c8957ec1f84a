//! Stored notification entity.

pub mod model;

pub use model::{CreateNotification, Notification};
