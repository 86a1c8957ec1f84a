//! # labhub-api
//!
//! HTTP and WebSocket surface for LabHub: the axum router, request and
//! response DTOs, JWT verification, error mapping, and the server
//! bootstrap that wires repositories, services, realtime, and the worker
//! together.

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::run_server;
pub use state::AppState;
