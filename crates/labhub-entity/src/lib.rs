//! # labhub-entity
//!
//! Domain entity models for LabHub: computers, heartbeat sessions, rooms,
//! users, and stored notifications. All persisted models derive
//! `sqlx::FromRow`; enums map to PostgreSQL enum types.

pub mod computer;
pub mod heartbeat;
pub mod notification;
pub mod room;
pub mod user;
