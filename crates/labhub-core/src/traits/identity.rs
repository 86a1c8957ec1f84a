//! Hardware identity resolution boundary.

use async_trait::async_trait;

/// Resolves a client network address to a hardware identity (MAC).
///
/// Platform-specific lookup mechanisms live behind this trait so they can
/// be swapped and mocked. Resolution failure is not an error condition:
/// implementations return `None` when the identity is unknown and must
/// never propagate a fatal error.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug {
    /// Look up the hardware identity for an IP address.
    async fn resolve(&self, ip_address: &str) -> Option<String>;
}
