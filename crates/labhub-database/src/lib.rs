//! # labhub-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations. The repository traits defined in
//! [`repositories::traits`] are the storage boundary the presence core
//! depends on; everything else in this crate is sqlx plumbing.

pub mod connection;
pub mod migration;
pub mod repositories;
