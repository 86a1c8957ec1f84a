//! HTTP and WebSocket request handlers.

pub mod computers;
pub mod health;
pub mod heartbeat;
pub mod status;
pub mod ws;
