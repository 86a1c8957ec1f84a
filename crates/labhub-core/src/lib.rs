//! # labhub-core
//!
//! Core crate for LabHub. Contains traits, configuration schemas,
//! domain events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LabHub crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
