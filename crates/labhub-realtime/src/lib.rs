//! # labhub-realtime
//!
//! Real-time WebSocket engine for LabHub. Provides:
//!
//! - WebSocket connection management with per-user connection limits
//! - Role-aware fan-out of presence events to lab staff
//! - Server-driven keepalive pings with pong timeouts
//! - Persistence of offline alerts as notification rows

pub mod connection;
pub mod message;
pub mod sink;

pub use connection::manager::ConnectionManager;
pub use sink::RealtimeSink;
