//! Adaptive interval policy.

use std::sync::Arc;

use chrono::Duration;
use tracing::warn;

use labhub_core::clock::Clock;
use labhub_core::config::heartbeat::HeartbeatConfig;
use labhub_core::result::AppResult;
use labhub_database::repositories::traits::HeartbeatStore;
use labhub_entity::computer::Computer;
use labhub_entity::heartbeat::{HeartbeatSession, PollInterval};

/// Decides the next polling interval for a computer.
///
/// Evaluation order is a policy choice, not incidental: instability and
/// maintenance escalate to [`PollInterval::High`] even when the page is
/// hidden or it is the middle of the night.
#[derive(Debug, Clone)]
pub struct IntervalPolicy {
    heartbeats: Arc<dyn HeartbeatStore>,
    clock: Arc<dyn Clock>,
    config: HeartbeatConfig,
}

impl IntervalPolicy {
    /// Create a new interval policy.
    pub fn new(
        heartbeats: Arc<dyn HeartbeatStore>,
        clock: Arc<dyn Clock>,
        config: HeartbeatConfig,
    ) -> Self {
        Self {
            heartbeats,
            clock,
            config,
        }
    }

    /// Compute the next interval.
    ///
    /// Never fails: any internal error degrades to [`PollInterval::Normal`]
    /// so a policy hiccup cannot fail the heartbeat that asked.
    pub async fn next_interval(
        &self,
        computer: &Computer,
        session: Option<&HeartbeatSession>,
        is_page_hidden: bool,
    ) -> PollInterval {
        match self.evaluate(computer, session, is_page_hidden).await {
            Ok(interval) => interval,
            Err(e) => {
                warn!(
                    computer_id = %computer.id,
                    error = %e,
                    "Interval policy evaluation failed, defaulting to normal"
                );
                PollInterval::Normal
            }
        }
    }

    async fn evaluate(
        &self,
        computer: &Computer,
        session: Option<&HeartbeatSession>,
        is_page_hidden: bool,
    ) -> AppResult<PollInterval> {
        // Tier 1: unstable or under maintenance.
        if self.has_active_issues(computer).await? || computer.in_maintenance() {
            return Ok(PollInterval::High);
        }

        // Tier 2: nobody is meaningfully watching this machine. Absence
        // of session context is not a demotion signal; only a session
        // known to have no user is.
        let hour = self.clock.local_hour();
        let after_hours =
            hour < self.config.working_hours_start || hour >= self.config.working_hours_end;
        let unattended = session.is_some_and(|s| s.user_id.is_none());
        if is_page_hidden || after_hours || unattended {
            return Ok(PollInterval::Low);
        }

        Ok(PollInterval::Normal)
    }

    /// Repeated-instability signal: two or more offline markers within
    /// the issue window. A ticket-based signal is a designed-for
    /// extension point here but is not wired in.
    async fn has_active_issues(&self, computer: &Computer) -> AppResult<bool> {
        let since = self.clock.now() - Duration::minutes(self.config.issue_window_minutes);
        let offline_count = self
            .heartbeats
            .count_offline_since(computer.id, since)
            .await?;
        Ok(offline_count >= 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use chrono::{DateTime, Utc};
    use labhub_core::clock::FixedClock;
    use labhub_entity::computer::ComputerStatus;
    use labhub_entity::heartbeat::SessionStatus;

    use crate::test_support::{make_computer, make_session, InMemoryHeartbeatStore};

    fn policy_at(
        store: Arc<InMemoryHeartbeatStore>,
        now: DateTime<Utc>,
        hour: u32,
    ) -> IntervalPolicy {
        IntervalPolicy::new(
            store,
            Arc::new(FixedClock::new(now, hour)),
            HeartbeatConfig::default(),
        )
    }

    fn attended_session(computer_id: uuid::Uuid) -> labhub_entity::heartbeat::HeartbeatSession {
        let mut session = make_session("abc", computer_id, SessionStatus::Online, Utc::now());
        session.user_id = Some(uuid::Uuid::new_v4());
        session
    }

    #[tokio::test]
    async fn test_normal_interval_for_healthy_attended_daytime() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let now = DateTime::from_str("2025-03-10T14:00:00Z").unwrap();
        let policy = policy_at(store, now, 14);

        let computer = make_computer("PC-05");
        let session = attended_session(computer.id);

        let interval = policy
            .next_interval(&computer, Some(&session), false)
            .await;
        assert_eq!(interval, PollInterval::Normal);
        assert_eq!(interval.as_seconds(), 30);
    }

    #[tokio::test]
    async fn test_high_interval_for_repeated_offline_markers() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let now = DateTime::from_str("2025-03-10T14:00:00Z").unwrap();
        let computer = make_computer("PC-05");

        for _ in 0..3 {
            store
                .insert_offline_marker(computer.id, now - Duration::minutes(20))
                .await
                .unwrap();
        }

        let policy = policy_at(store, now, 14);
        let session = attended_session(computer.id);

        // High wins even when the page is hidden (priority ordering).
        let interval = policy.next_interval(&computer, Some(&session), true).await;
        assert_eq!(interval, PollInterval::High);
        assert_eq!(interval.as_seconds(), 10);
    }

    #[tokio::test]
    async fn test_old_offline_markers_do_not_escalate() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let now = DateTime::from_str("2025-03-10T14:00:00Z").unwrap();
        let computer = make_computer("PC-05");

        for _ in 0..3 {
            store
                .insert_offline_marker(computer.id, now - Duration::minutes(90))
                .await
                .unwrap();
        }

        let policy = policy_at(store, now, 14);
        let session = attended_session(computer.id);

        let interval = policy
            .next_interval(&computer, Some(&session), false)
            .await;
        assert_eq!(interval, PollInterval::Normal);
    }

    #[tokio::test]
    async fn test_high_interval_for_maintenance() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let now = Utc::now();
        let policy = policy_at(store, now, 14);

        let mut computer = make_computer("PC-05");
        computer.status = ComputerStatus::Maintenance;
        let session = attended_session(computer.id);

        let interval = policy
            .next_interval(&computer, Some(&session), false)
            .await;
        assert_eq!(interval, PollInterval::High);
    }

    #[tokio::test]
    async fn test_low_interval_after_hours() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let now = DateTime::from_str("2025-03-10T02:00:00Z").unwrap();
        let policy = policy_at(store, now, 2);

        let computer = make_computer("PC-05");
        let session = attended_session(computer.id);

        let interval = policy
            .next_interval(&computer, Some(&session), false)
            .await;
        assert_eq!(interval, PollInterval::Low);
        assert_eq!(interval.as_seconds(), 120);
    }

    #[tokio::test]
    async fn test_low_interval_when_page_hidden() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let policy = policy_at(store, Utc::now(), 14);

        let computer = make_computer("PC-05");
        let session = attended_session(computer.id);

        let interval = policy.next_interval(&computer, Some(&session), true).await;
        assert_eq!(interval, PollInterval::Low);
    }

    #[tokio::test]
    async fn test_low_interval_for_unattended_session() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let policy = policy_at(store, Utc::now(), 14);
        let computer = make_computer("PC-05");

        let unattended = make_session("abc", computer.id, SessionStatus::Online, Utc::now());
        let interval = policy
            .next_interval(&computer, Some(&unattended), false)
            .await;
        assert_eq!(interval, PollInterval::Low);
    }

    #[tokio::test]
    async fn test_missing_session_context_stays_normal() {
        let store = Arc::new(InMemoryHeartbeatStore::default());
        let policy = policy_at(store, Utc::now(), 14);
        let computer = make_computer("PC-05");

        let interval = policy.next_interval(&computer, None, false).await;
        assert_eq!(interval, PollInterval::Normal);
    }

    #[tokio::test]
    async fn test_storage_failure_degrades_to_normal() {
        let store = Arc::new(InMemoryHeartbeatStore::failing());
        let policy = policy_at(store, Utc::now(), 14);

        let computer = make_computer("PC-05");
        let session = attended_session(computer.id);

        let interval = policy
            .next_interval(&computer, Some(&session), false)
            .await;
        assert_eq!(interval, PollInterval::Normal);
    }

    #[tokio::test]
    async fn test_determinism() {
        let now = DateTime::from_str("2025-03-10T14:00:00Z").unwrap();
        let computer = make_computer("PC-05");
        let session = attended_session(computer.id);

        for _ in 0..5 {
            let store = Arc::new(InMemoryHeartbeatStore::default());
            let policy = policy_at(store, now, 14);
            assert_eq!(
                policy.next_interval(&computer, Some(&session), false).await,
                PollInterval::Normal
            );
        }
    }
}
