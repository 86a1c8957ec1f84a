//! Derived status aggregation for rooms and individual computers.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use labhub_core::clock::Clock;
use labhub_core::config::heartbeat::HeartbeatConfig;
use labhub_core::error::AppError;
use labhub_core::result::AppResult;
use labhub_database::repositories::traits::{ComputerStore, HeartbeatStore, RoomStore};
use labhub_entity::computer::Computer;
use labhub_entity::heartbeat::{DerivedStatus, SessionStatus};

/// Derive the display status for a computer.
///
/// Evaluation order is fixed: the persisted offline flag dominates
/// everything, repeated instability dominates idleness.
pub fn derive_status(
    is_online: bool,
    recent_offline_markers: i64,
    latest_session: Option<SessionStatus>,
) -> DerivedStatus {
    if !is_online {
        return DerivedStatus::Offline;
    }
    if recent_offline_markers >= 2 {
        return DerivedStatus::Warning;
    }
    if latest_session == Some(SessionStatus::Idle) {
        return DerivedStatus::Idle;
    }
    DerivedStatus::Online
}

/// Per-computer status detail in a summary response.
#[derive(Debug, Clone, Serialize)]
pub struct ComputerStatusDetail {
    /// The computer.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Room assignment, if any.
    pub room_id: Option<Uuid>,
    /// Derived display status.
    pub status: DerivedStatus,
    /// Raw persisted online flag.
    pub is_online: bool,
    /// When the computer was last seen.
    pub last_seen: Option<DateTime<Utc>>,
    /// The user currently at the computer.
    pub current_user_id: Option<Uuid>,
}

/// Aggregated presence state of one room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    /// The room.
    pub room_id: Uuid,
    /// Room display name.
    pub room_name: String,
    /// Computers assigned to the room.
    pub total_computers: usize,
    /// Computers currently online.
    pub online: usize,
    /// Computers currently offline.
    pub offline: usize,
    /// Per-computer detail, present when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computers: Option<Vec<ComputerStatusDetail>>,
}

/// Read-side aggregation over computers, sessions, and rooms.
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    computers: Arc<dyn ComputerStore>,
    heartbeats: Arc<dyn HeartbeatStore>,
    rooms: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
    config: HeartbeatConfig,
}

impl StatusAggregator {
    /// Create a new aggregator.
    pub fn new(
        computers: Arc<dyn ComputerStore>,
        heartbeats: Arc<dyn HeartbeatStore>,
        rooms: Arc<dyn RoomStore>,
        clock: Arc<dyn Clock>,
        config: HeartbeatConfig,
    ) -> Self {
        Self {
            computers,
            heartbeats,
            rooms,
            clock,
            config,
        }
    }

    /// Derive the display status for a computer's current persisted state.
    pub async fn derive_for(&self, computer: &Computer) -> AppResult<DerivedStatus> {
        let since = self.clock.now() - Duration::hours(self.config.warning_window_hours);
        let markers = self
            .heartbeats
            .count_offline_since(computer.id, since)
            .await?;
        let latest = self
            .heartbeats
            .latest_for_computer(computer.id)
            .await?
            .map(|s| s.status);
        Ok(derive_status(computer.is_online, markers, latest))
    }

    /// Detailed derived status for one computer.
    pub async fn computer_detail(&self, id: Uuid) -> AppResult<ComputerStatusDetail> {
        let computer = self
            .computers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Computer {id} not found")))?;
        self.detail_for(computer).await
    }

    /// Aggregated summaries, for all rooms or a single one.
    ///
    /// An unknown `room_id` is `NotFound`; a known room with no computers
    /// yields a summary with zero counts.
    pub async fn room_summaries(
        &self,
        room_id: Option<Uuid>,
        include_computers: bool,
    ) -> AppResult<Vec<RoomSummary>> {
        let rooms = match room_id {
            Some(id) => {
                let room = self
                    .rooms
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Room {id} not found")))?;
                vec![room]
            }
            None => self.rooms.list().await?,
        };

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let computers = self.computers.list(Some(room.id)).await?;
            let online = computers.iter().filter(|c| c.is_online).count();
            let detail = if include_computers {
                let mut details = Vec::with_capacity(computers.len());
                for computer in &computers {
                    details.push(self.detail_for(computer.clone()).await?);
                }
                Some(details)
            } else {
                None
            };
            summaries.push(RoomSummary {
                room_id: room.id,
                room_name: room.name,
                total_computers: computers.len(),
                online,
                offline: computers.len() - online,
                computers: detail,
            });
        }
        Ok(summaries)
    }

    async fn detail_for(&self, computer: Computer) -> AppResult<ComputerStatusDetail> {
        let status = self.derive_for(&computer).await?;
        Ok(ComputerStatusDetail {
            id: computer.id,
            name: computer.name,
            room_id: computer.room_id,
            status,
            is_online: computer.is_online,
            last_seen: computer.last_seen,
            current_user_id: computer.current_user_id,
        })
    }
}
