//! Scheduled detection of computers that stopped heartbeating.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use labhub_core::clock::Clock;
use labhub_core::config::heartbeat::HeartbeatConfig;
use labhub_core::events::PresenceEvent;
use labhub_core::result::AppResult;
use labhub_core::traits::EventSink;
use labhub_database::repositories::traits::{ComputerStore, HeartbeatStore};
use labhub_entity::computer::Computer;
use labhub_entity::heartbeat::DerivedStatus;

/// Sweeps active sessions for stale heartbeats and transitions their
/// computers to offline.
///
/// Each stale session row is closed as it is swept, so the set the next
/// sweep scans stays bounded. A computer whose `last_seen` is fresher
/// than the cutoff is not transitioned even when a leftover stale row
/// points at it; it came back under a newer session.
#[derive(Debug, Clone)]
pub struct OfflineMonitor {
    computers: Arc<dyn ComputerStore>,
    heartbeats: Arc<dyn HeartbeatStore>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    config: HeartbeatConfig,
}

impl OfflineMonitor {
    /// Create a new offline monitor.
    pub fn new(
        computers: Arc<dyn ComputerStore>,
        heartbeats: Arc<dyn HeartbeatStore>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        config: HeartbeatConfig,
    ) -> Self {
        Self {
            computers,
            heartbeats,
            sink,
            clock,
            config,
        }
    }

    /// Run one sweep. Returns how many computers were transitioned.
    ///
    /// A failure to list stale sessions fails the sweep; failures on an
    /// individual computer are logged and the loop moves on.
    pub async fn sweep(&self) -> AppResult<usize> {
        let now = self.clock.now();
        let cutoff = now - Duration::seconds(self.config.offline_threshold_seconds);
        let stale = self.heartbeats.find_stale_active(cutoff).await?;

        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut transitioned = 0;
        for session in stale {
            if let Err(e) = self.heartbeats.end_session(&session.session_key, now).await {
                warn!(
                    session_key = %session.session_key,
                    error = %e,
                    "Failed to close stale session, continuing sweep"
                );
            }
            if !seen.insert(session.computer_id) {
                continue;
            }
            match self.transition(session.computer_id, cutoff).await {
                Ok(true) => transitioned += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        computer_id = %session.computer_id,
                        error = %e,
                        "Offline transition failed, continuing sweep"
                    );
                }
            }
        }

        if transitioned > 0 {
            info!(transitioned, "Offline sweep marked computers offline");
        }
        Ok(transitioned)
    }

    /// Transition one computer to offline. Returns false when it was
    /// already offline, no longer exists, or has heartbeated since the
    /// cutoff.
    async fn transition(
        &self,
        computer_id: Uuid,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<bool> {
        let Some(computer) = self.computers.find_by_id(computer_id).await? else {
            warn!(computer_id = %computer_id, "Stale session references unknown computer");
            return Ok(false);
        };
        if !computer.is_online {
            return Ok(false);
        }
        if computer.last_seen.is_some_and(|seen| seen >= cutoff) {
            return Ok(false);
        }

        let now = self.clock.now();
        self.computers.set_offline(computer.id).await?;
        self.heartbeats
            .insert_offline_marker(computer.id, now)
            .await?;

        self.publish(&computer).await;
        Ok(true)
    }

    async fn publish(&self, computer: &Computer) {
        let detected_at = self.clock.now();
        self.sink
            .publish(PresenceEvent::OfflineAlert {
                computer_id: computer.id,
                computer_name: computer.name.clone(),
                room_id: computer.room_id,
                last_seen: computer.last_seen,
                detected_at,
            })
            .await;
        self.sink
            .publish(PresenceEvent::StatusBroadcast {
                computer_id: computer.id,
                computer_name: computer.name.clone(),
                room_id: computer.room_id,
                status: DerivedStatus::Offline.as_str().to_string(),
                user_id: None,
                last_seen: computer.last_seen,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use labhub_core::clock::FixedClock;
    use labhub_entity::heartbeat::SessionStatus;

    use crate::test_support::{
        make_computer, make_session, InMemoryComputerStore, InMemoryHeartbeatStore, RecordingSink,
    };

    struct Harness {
        computers: Arc<InMemoryComputerStore>,
        heartbeats: Arc<InMemoryHeartbeatStore>,
        sink: Arc<RecordingSink>,
        monitor: OfflineMonitor,
    }

    fn harness() -> Harness {
        let computers = Arc::new(InMemoryComputerStore::default());
        let heartbeats = Arc::new(InMemoryHeartbeatStore::default());
        let sink = Arc::new(RecordingSink::default());
        let clock = Arc::new(FixedClock::new(Utc::now(), 14));
        let monitor = OfflineMonitor::new(
            computers.clone(),
            heartbeats.clone(),
            sink.clone(),
            clock,
            HeartbeatConfig::default(),
        );
        Harness {
            computers,
            heartbeats,
            sink,
            monitor,
        }
    }

    fn seed_stale(h: &Harness, name: &str) -> Computer {
        let mut computer = make_computer(name);
        computer.is_online = true;
        computer.current_user_id = Some(Uuid::new_v4());
        h.computers.seed(computer.clone());
        h.heartbeats.seed(make_session(
            &format!("sess-{name}"),
            computer.id,
            SessionStatus::Online,
            Utc::now() - Duration::minutes(5),
        ));
        computer
    }

    #[tokio::test]
    async fn test_sweep_transitions_stale_computer() {
        let h = harness();
        let computer = seed_stale(&h, "PC-01");

        let transitioned = h.monitor.sweep().await.unwrap();
        assert_eq!(transitioned, 1);

        let stored = h.computers.get(computer.id).unwrap();
        assert!(!stored.is_online);
        assert!(stored.current_user_id.is_none());

        // One synthetic marker appended next to the now-closed session row.
        let markers: Vec<_> = h
            .heartbeats
            .all()
            .into_iter()
            .filter(|s| s.session_key.starts_with("offline:"))
            .collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].status, SessionStatus::Offline);
        assert!(!markers[0].is_active);
    }

    #[tokio::test]
    async fn test_sweep_publishes_alert_and_broadcast() {
        let h = harness();
        seed_stale(&h, "PC-01");

        h.monitor.sweep().await.unwrap();

        let events = h.sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], PresenceEvent::OfflineAlert { .. }));
        match &events[1] {
            PresenceEvent::StatusBroadcast { status, .. } => assert_eq!(status, "offline"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_sweep_is_a_no_op() {
        let h = harness();
        seed_stale(&h, "PC-01");

        assert_eq!(h.monitor.sweep().await.unwrap(), 1);
        assert_eq!(h.monitor.sweep().await.unwrap(), 0);
        assert_eq!(h.sink.events().len(), 2);
    }

    #[tokio::test]
    async fn test_sweep_closes_stale_session_rows() {
        let h = harness();
        seed_stale(&h, "PC-01");

        h.monitor.sweep().await.unwrap();

        assert!(h
            .heartbeats
            .find_active_by_key("sess-PC-01")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_leftover_stale_row_does_not_flap_reonlined_computer() {
        let h = harness();
        let mut computer = make_computer("PC-01");
        computer.is_online = true;
        // Heartbeated seconds ago under a new session key.
        computer.last_seen = Some(Utc::now() - Duration::seconds(5));
        h.computers.seed(computer.clone());
        h.heartbeats.seed(make_session(
            "sess-new",
            computer.id,
            SessionStatus::Online,
            Utc::now() - Duration::seconds(5),
        ));
        // Leftover row from before the machine last went offline.
        h.heartbeats.seed(make_session(
            "sess-old",
            computer.id,
            SessionStatus::Online,
            Utc::now() - Duration::minutes(10),
        ));

        assert_eq!(h.monitor.sweep().await.unwrap(), 0);
        assert!(h.computers.get(computer.id).unwrap().is_online);
        assert!(h.sink.events().is_empty());

        // The leftover row is closed so it never resurfaces.
        assert!(h
            .heartbeats
            .find_active_by_key("sess-old")
            .await
            .unwrap()
            .is_none());
        assert!(h
            .heartbeats
            .find_active_by_key("sess-new")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_fresh_sessions_are_untouched() {
        let h = harness();
        let mut computer = make_computer("PC-01");
        computer.is_online = true;
        h.computers.seed(computer.clone());
        h.heartbeats.seed(make_session(
            "sess-fresh",
            computer.id,
            SessionStatus::Online,
            Utc::now() - Duration::seconds(30),
        ));

        assert_eq!(h.monitor.sweep().await.unwrap(), 0);
        assert!(h.computers.get(computer.id).unwrap().is_online);
    }

    #[tokio::test]
    async fn test_unknown_computer_does_not_abort_sweep() {
        let h = harness();
        // Stale session for a computer that was deleted.
        h.heartbeats.seed(make_session(
            "sess-ghost",
            Uuid::new_v4(),
            SessionStatus::Online,
            Utc::now() - Duration::minutes(10),
        ));
        seed_stale(&h, "PC-02");

        assert_eq!(h.monitor.sweep().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_two_stale_sessions_one_computer_transition_once() {
        let h = harness();
        let computer = seed_stale(&h, "PC-01");
        h.heartbeats.seed(make_session(
            "sess-extra",
            computer.id,
            SessionStatus::Online,
            Utc::now() - Duration::minutes(8),
        ));

        assert_eq!(h.monitor.sweep().await.unwrap(), 1);
    }
}
