//! WebSocket connection lifecycle: handles, pool, manager, keepalive.

pub mod handle;
pub mod keepalive;
pub mod manager;
pub mod pool;

pub use handle::{ConnectionHandle, ConnectionId};
pub use keepalive::KeepaliveMonitor;
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;
