//! # labhub-service
//!
//! The presence engine: heartbeat processing, adaptive interval policy,
//! the offline monitor sweep, and derived status aggregation. Storage is
//! reached only through the repository traits in `labhub-database`;
//! outbound events go through the [`EventSink`](labhub_core::traits::EventSink)
//! boundary, so this crate never touches sockets or SQL directly.

pub mod heartbeat;
pub mod netid;
pub mod registration;

#[cfg(test)]
pub(crate) mod test_support;
