//! Heartbeat ingestion and session termination.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use labhub_core::clock::Clock;
use labhub_core::error::AppError;
use labhub_core::events::PresenceEvent;
use labhub_core::result::AppResult;
use labhub_core::traits::EventSink;
use labhub_database::repositories::traits::{ComputerStore, HeartbeatStore};
use labhub_entity::computer::Computer;
use labhub_entity::heartbeat::{
    DerivedStatus, HeartbeatSession, PollInterval, SessionStatus, UpsertHeartbeat,
};

use super::{IntervalPolicy, StatusAggregator};

/// One inbound heartbeat, after transport-level validation.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatRequest {
    /// The computer the heartbeat is for.
    pub computer_id: Uuid,
    /// Caller-supplied session identifier.
    pub session_key: String,
    /// Reported session status.
    pub status: SessionStatus,
    /// Whether the reporting page is hidden.
    #[serde(default)]
    pub is_page_hidden: bool,
    /// The acting user, when authenticated.
    pub user_id: Option<Uuid>,
    /// Hardware identity fallback for id lookups.
    pub mac_address: Option<String>,
}

/// What a processed heartbeat hands back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatOutcome {
    /// The upserted session row.
    pub session: HeartbeatSession,
    /// The interval the client should wait before its next heartbeat.
    pub next_interval: PollInterval,
    /// The resolved computer.
    pub computer: Computer,
}

/// Processes heartbeats and session terminations.
#[derive(Debug, Clone)]
pub struct HeartbeatService {
    computers: Arc<dyn ComputerStore>,
    heartbeats: Arc<dyn HeartbeatStore>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    policy: IntervalPolicy,
    aggregator: StatusAggregator,
}

impl HeartbeatService {
    /// Create a new heartbeat service.
    pub fn new(
        computers: Arc<dyn ComputerStore>,
        heartbeats: Arc<dyn HeartbeatStore>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        policy: IntervalPolicy,
        aggregator: StatusAggregator,
    ) -> Self {
        Self {
            computers,
            heartbeats,
            sink,
            clock,
            policy,
            aggregator,
        }
    }

    /// Process one heartbeat.
    ///
    /// Storage errors fail the call; the broadcast at the end never does.
    pub async fn process(&self, request: HeartbeatRequest) -> AppResult<HeartbeatOutcome> {
        let computer = self.resolve_computer(&request).await?;

        // Policy runs before the upsert, so it sees the persisted computer
        // state and no session row. Missing session context keeps the
        // normal tier; only a session known to be userless demotes.
        let interval = self
            .policy
            .next_interval(&computer, None, request.is_page_hidden)
            .await;

        let now = self.clock.now();
        let session = self
            .heartbeats
            .upsert(&UpsertHeartbeat {
                session_key: request.session_key.clone(),
                computer_id: computer.id,
                user_id: request.user_id,
                status: request.status,
                interval_used: interval.as_seconds() as i32,
                timestamp: now,
            })
            .await?;

        self.computers
            .set_online(computer.id, request.user_id, now)
            .await?;

        debug!(
            computer_id = %computer.id,
            session_key = %request.session_key,
            interval_seconds = interval.as_seconds(),
            "Heartbeat processed"
        );

        let mut computer = computer;
        computer.is_online = true;
        computer.last_seen = Some(now);
        if request.user_id.is_some() {
            computer.current_user_id = request.user_id;
        }

        self.broadcast_status(&computer).await;

        Ok(HeartbeatOutcome {
            session,
            next_interval: interval,
            computer,
        })
    }

    /// Terminate a session by key, on behalf of its owning user.
    pub async fn end_session(&self, session_key: &str, acting_user: Uuid) -> AppResult<()> {
        let session = self
            .heartbeats
            .find_active_by_key(session_key)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Active session '{session_key}' not found"))
            })?;

        if let Some(owner) = session.user_id {
            if owner != acting_user {
                return Err(AppError::authorization(
                    "Only the session's own user may end it",
                ));
            }
        }

        let now = self.clock.now();
        self.heartbeats.end_session(session_key, now).await?;
        self.computers.set_offline(session.computer_id).await?;

        debug!(
            computer_id = %session.computer_id,
            session_key = %session_key,
            "Session ended"
        );

        if let Ok(Some(mut computer)) = self.computers.find_by_id(session.computer_id).await {
            computer.is_online = false;
            computer.current_user_id = None;
            self.broadcast_status(&computer).await;
        }
        Ok(())
    }

    async fn resolve_computer(&self, request: &HeartbeatRequest) -> AppResult<Computer> {
        if let Some(computer) = self.computers.find_by_id(request.computer_id).await? {
            return Ok(computer);
        }
        if let Some(mac) = request.mac_address.as_deref() {
            if let Some(computer) = self.computers.find_by_mac(mac).await? {
                return Ok(computer);
            }
        }
        Err(AppError::not_found(format!(
            "Computer {} not found",
            request.computer_id
        )))
    }

    async fn broadcast_status(&self, computer: &Computer) {
        let status = match self.aggregator.derive_for(computer).await {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    computer_id = %computer.id,
                    error = %e,
                    "Status derivation for broadcast failed, using raw flag"
                );
                if computer.is_online {
                    DerivedStatus::Online
                } else {
                    DerivedStatus::Offline
                }
            }
        };
        self.sink
            .publish(PresenceEvent::StatusBroadcast {
                computer_id: computer.id,
                computer_name: computer.name.clone(),
                room_id: computer.room_id,
                status: status.as_str().to_string(),
                user_id: computer.current_user_id,
                last_seen: computer.last_seen,
            })
            .await;
    }
}
