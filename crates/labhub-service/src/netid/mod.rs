//! Hardware identity resolution via the platform ARP table.
//!
//! Lab machines sit on the same L2 segment as the server, so a recent
//! heartbeat or registration request leaves an ARP entry we can read to
//! learn the client's MAC address. Resolution is strictly best-effort.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use labhub_core::traits::IdentityResolver;

/// Resolves MAC addresses by shelling out to the ARP table.
///
/// Tries `ip neigh show` first and falls back to `arp -a`. Any failure
/// (command missing, no entry, unparsable output) resolves to `None`.
#[derive(Debug, Default)]
pub struct ArpIdentityResolver;

#[async_trait]
impl IdentityResolver for ArpIdentityResolver {
    async fn resolve(&self, ip_address: &str) -> Option<String> {
        if ip_address.is_empty() {
            return None;
        }
        for (program, args) in [
            ("ip", vec!["neigh", "show", ip_address]),
            ("arp", vec!["-a", ip_address]),
        ] {
            if let Some(mac) = query(program, &args).await {
                debug!(ip = %ip_address, mac = %mac, "Resolved hardware identity");
                return Some(mac);
            }
        }
        debug!(ip = %ip_address, "No hardware identity found");
        None
    }
}

async fn query(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    extract_mac(&String::from_utf8_lossy(&output.stdout))
}

/// Pull the first MAC-shaped token out of ARP-style command output.
fn extract_mac(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|token| is_mac(token))
        .map(|token| token.to_lowercase())
}

fn is_mac(token: &str) -> bool {
    let parts: Vec<&str> = token.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}
