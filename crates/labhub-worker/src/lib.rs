//! # labhub-worker
//!
//! Cron-driven background work. The only scheduled task is the offline
//! sweep, which runs every minute behind a non-overlap guard.

pub mod scheduler;

pub use scheduler::SweepScheduler;
