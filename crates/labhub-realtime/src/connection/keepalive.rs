//! Ping/pong keepalive for WebSocket connections.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;
use tracing::{debug, warn};

use labhub_core::config::realtime::RealtimeConfig;

use crate::message::OutboundMessage;

use super::handle::ConnectionHandle;

/// Per-connection keepalive loop.
///
/// Sends periodic pings and marks the connection dead when no pong has
/// arrived within interval + timeout. The socket task runs one of these
/// per connection and tears the socket down when the loop exits.
#[derive(Debug, Clone)]
pub struct KeepaliveMonitor {
    ping_interval: Duration,
    pong_deadline: Duration,
}

impl KeepaliveMonitor {
    /// Build a monitor from the realtime configuration.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds),
            pong_deadline: Duration::from_secs(
                config.ping_interval_seconds + config.ping_timeout_seconds,
            ),
        }
    }

    /// Run the keepalive loop until the connection dies.
    pub async fn run(&self, handle: Arc<ConnectionHandle>) {
        let mut interval = time::interval(self.ping_interval);
        // The first tick fires immediately; skip it so a fresh connection
        // is not pinged before it finishes its handshake.
        interval.tick().await;

        loop {
            interval.tick().await;

            if !handle.is_alive() {
                break;
            }

            let last_pong = *handle.last_pong.read().await;
            if let Ok(elapsed) = (Utc::now() - last_pong).to_std() {
                if elapsed > self.pong_deadline {
                    warn!(
                        conn_id = %handle.id,
                        elapsed_seconds = elapsed.as_secs(),
                        "Keepalive timeout, marking connection dead"
                    );
                    handle.mark_dead();
                    break;
                }
            }

            if !handle.send(OutboundMessage::Ping {
                timestamp: Utc::now().timestamp(),
            }) {
                debug!(conn_id = %handle.id, "Ping send failed, marking dead");
                handle.mark_dead();
                break;
            }
        }

        debug!(conn_id = %handle.id, "Keepalive loop ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use labhub_entity::user::UserRole;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    #[tokio::test(start_paused = true)]
    async fn test_ping_sent_each_interval() {
        let config = RealtimeConfig {
            ping_interval_seconds: 1,
            ping_timeout_seconds: 60,
            ..RealtimeConfig::default()
        };
        let (tx, mut rx) = mpsc::channel(8);
        let handle = Arc::new(ConnectionHandle::new(
            Uuid::new_v4(),
            UserRole::Staff,
            "s".to_string(),
            tx,
        ));
        let monitor = KeepaliveMonitor::new(&config);

        let h = handle.clone();
        let task = tokio::spawn(async move { monitor.run(h).await });

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(matches!(rx.try_recv(), Ok(OutboundMessage::Ping { .. })));

        handle.mark_dead();
        tokio::time::sleep(Duration::from_secs(2)).await;
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_when_receiver_drops() {
        let config = RealtimeConfig {
            ping_interval_seconds: 1,
            ping_timeout_seconds: 60,
            ..RealtimeConfig::default()
        };
        let (tx, rx) = mpsc::channel(8);
        let handle = Arc::new(ConnectionHandle::new(
            Uuid::new_v4(),
            UserRole::Staff,
            "s".to_string(),
            tx,
        ));
        drop(rx);

        let monitor = KeepaliveMonitor::new(&config);
        monitor.run(handle.clone()).await;
        assert!(!handle.is_alive());
    }
}
