//! In-memory fakes and fixtures shared by the presence engine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use labhub_core::error::AppError;
use labhub_core::events::PresenceEvent;
use labhub_core::result::AppResult;
use labhub_core::traits::EventSink;
use labhub_database::repositories::traits::{ComputerStore, HeartbeatStore, RoomStore};
use labhub_entity::computer::{Computer, ComputerStatus};
use labhub_entity::heartbeat::{HeartbeatSession, SessionStatus, UpsertHeartbeat};
use labhub_entity::room::Room;

/// Build a registered, offline computer.
pub fn make_computer(name: &str) -> Computer {
    let now = Utc::now();
    Computer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        mac_address: None,
        room_id: None,
        is_online: false,
        last_seen: None,
        current_user_id: None,
        status: ComputerStatus::Available,
        created_at: now,
        updated_at: now,
    }
}

/// Build an unattended session row.
pub fn make_session(
    key: &str,
    computer_id: Uuid,
    status: SessionStatus,
    timestamp: DateTime<Utc>,
) -> HeartbeatSession {
    HeartbeatSession {
        id: Uuid::new_v4(),
        session_key: key.to_string(),
        computer_id,
        user_id: None,
        status,
        timestamp,
        interval_used: 30,
        session_start: timestamp,
        session_end: None,
        is_active: true,
    }
}

/// In-memory [`HeartbeatStore`], keyed by session key like the real table.
#[derive(Debug, Default)]
pub struct InMemoryHeartbeatStore {
    sessions: Mutex<HashMap<String, HeartbeatSession>>,
    fail: bool,
}

impl InMemoryHeartbeatStore {
    /// A store whose every call errors, for degradation tests.
    pub fn failing() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    /// Seed an existing session row.
    pub fn seed(&self, session: HeartbeatSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.session_key.clone(), session);
    }

    /// Snapshot of all rows.
    pub fn all(&self) -> Vec<HeartbeatSession> {
        self.sessions.lock().unwrap().values().cloned().collect()
    }

    fn check(&self) -> AppResult<()> {
        if self.fail {
            Err(AppError::database("storage unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HeartbeatStore for InMemoryHeartbeatStore {
    async fn upsert(&self, data: &UpsertHeartbeat) -> AppResult<HeartbeatSession> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .entry(data.session_key.clone())
            .and_modify(|existing| {
                existing.status = data.status;
                existing.timestamp = data.timestamp;
                existing.interval_used = data.interval_used;
                existing.user_id = data.user_id;
                existing.is_active = true;
            })
            .or_insert_with(|| HeartbeatSession {
                id: Uuid::new_v4(),
                session_key: data.session_key.clone(),
                computer_id: data.computer_id,
                user_id: data.user_id,
                status: data.status,
                timestamp: data.timestamp,
                interval_used: data.interval_used,
                session_start: data.timestamp,
                session_end: None,
                is_active: true,
            });
        Ok(session.clone())
    }

    async fn find_active_by_key(&self, session_key: &str) -> AppResult<Option<HeartbeatSession>> {
        self.check()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(session_key)
            .filter(|s| s.is_active)
            .cloned())
    }

    async fn latest_for_computer(&self, computer_id: Uuid) -> AppResult<Option<HeartbeatSession>> {
        self.check()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.computer_id == computer_id)
            .max_by_key(|s| s.timestamp)
            .cloned())
    }

    async fn count_offline_since(
        &self,
        computer_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        self.check()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.computer_id == computer_id
                    && s.session_key.starts_with("offline:")
                    && s.timestamp >= since
            })
            .count() as i64)
    }

    async fn find_stale_active(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<HeartbeatSession>> {
        self.check()?;
        let mut stale: Vec<HeartbeatSession> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.is_active && s.timestamp < cutoff)
            .cloned()
            .collect();
        stale.sort_by_key(|s| s.timestamp);
        Ok(stale)
    }

    async fn insert_offline_marker(
        &self,
        computer_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<HeartbeatSession> {
        self.check()?;
        let key = format!("offline:{}", Uuid::new_v4());
        let marker = HeartbeatSession {
            id: Uuid::new_v4(),
            session_key: key.clone(),
            computer_id,
            user_id: None,
            status: SessionStatus::Offline,
            timestamp: at,
            interval_used: 0,
            session_start: at,
            session_end: Some(at),
            is_active: false,
        };
        self.sessions.lock().unwrap().insert(key, marker.clone());
        Ok(marker)
    }

    async fn end_session(&self, session_key: &str, at: DateTime<Utc>) -> AppResult<()> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(session_key).filter(|s| s.is_active) {
            Some(session) => {
                session.is_active = false;
                session.status = SessionStatus::Offline;
                session.session_end = Some(at);
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Active session '{session_key}' not found"
            ))),
        }
    }
}

/// In-memory [`ComputerStore`].
#[derive(Debug, Default)]
pub struct InMemoryComputerStore {
    computers: Mutex<HashMap<Uuid, Computer>>,
}

impl InMemoryComputerStore {
    /// Seed a computer row.
    pub fn seed(&self, computer: Computer) {
        self.computers
            .lock()
            .unwrap()
            .insert(computer.id, computer);
    }

    /// Fetch one computer back out.
    pub fn get(&self, id: Uuid) -> Option<Computer> {
        self.computers.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl ComputerStore for InMemoryComputerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Computer>> {
        Ok(self.computers.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_mac(&self, mac_address: &str) -> AppResult<Option<Computer>> {
        Ok(self
            .computers
            .lock()
            .unwrap()
            .values()
            .find(|c| c.mac_address.as_deref() == Some(mac_address))
            .cloned())
    }

    async fn list(&self, room_id: Option<Uuid>) -> AppResult<Vec<Computer>> {
        let mut computers: Vec<Computer> = self
            .computers
            .lock()
            .unwrap()
            .values()
            .filter(|c| room_id.is_none() || c.room_id == room_id)
            .cloned()
            .collect();
        computers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(computers)
    }

    async fn set_online(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
        seen_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut computers = self.computers.lock().unwrap();
        let computer = computers
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Computer {id} not found")))?;
        computer.is_online = true;
        computer.last_seen = Some(seen_at);
        if user_id.is_some() {
            computer.current_user_id = user_id;
        }
        Ok(())
    }

    async fn set_offline(&self, id: Uuid) -> AppResult<()> {
        if let Some(computer) = self.computers.lock().unwrap().get_mut(&id) {
            computer.is_online = false;
            computer.current_user_id = None;
        }
        Ok(())
    }

    async fn create(
        &self,
        name: &str,
        mac_address: Option<&str>,
        room_id: Option<Uuid>,
    ) -> AppResult<Computer> {
        let mut computer = make_computer(name);
        computer.mac_address = mac_address.map(str::to_string);
        computer.room_id = room_id;
        self.computers
            .lock()
            .unwrap()
            .insert(computer.id, computer.clone());
        Ok(computer)
    }
}

/// Build a room row.
pub fn make_room(name: &str) -> Room {
    Room {
        id: Uuid::new_v4(),
        name: name.to_string(),
        capacity: 24,
        status: "open".to_string(),
        created_at: Utc::now(),
    }
}

/// In-memory [`RoomStore`].
#[derive(Debug, Default)]
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<Uuid, Room>>,
}

impl InMemoryRoomStore {
    /// Seed a room row.
    pub fn seed(&self, room: Room) {
        self.rooms.lock().unwrap().insert(room.id, room);
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        Ok(self.rooms.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self.rooms.lock().unwrap().values().cloned().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }
}

/// Event sink that records everything published.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PresenceEvent>>,
}

impl RecordingSink {
    /// All events published so far.
    pub fn events(&self) -> Vec<PresenceEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: PresenceEvent) {
        self.events.lock().unwrap().push(event);
    }
}
