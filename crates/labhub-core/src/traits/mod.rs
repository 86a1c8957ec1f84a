//! Core traits defined in `labhub-core` and implemented by other crates.

pub mod event_sink;
pub mod identity;

pub use event_sink::EventSink;
pub use identity::IdentityResolver;
