//! Domain events emitted by the presence core and delivered by the
//! realtime layer.

pub mod presence;

pub use presence::{Audience, PresenceEvent};
