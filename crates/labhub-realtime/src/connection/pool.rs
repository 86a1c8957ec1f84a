//! Connection pool, indexed by user and by connection ID.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// User ID → connection handles (one user can have several tabs open).
    by_user: DashMap<Uuid, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_user.remove(&handle.user_id);
            }
        }
        Some(handle)
    }

    /// All connections for a user.
    pub fn user_connections(&self, user_id: &Uuid) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// A specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// All connections whose user role is lab staff.
    pub fn staff_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .filter(|entry| entry.value().role.is_lab_staff())
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use labhub_entity::user::UserRole;
    use tokio::sync::mpsc;

    use crate::message::OutboundMessage;

    fn handle(user_id: Uuid, role: UserRole) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel::<OutboundMessage>(4);
        // Receiver dropped on purpose; these tests only exercise indexing.
        Arc::new(ConnectionHandle::new(user_id, role, "u".to_string(), tx))
    }

    #[test]
    fn test_add_and_remove_maintains_both_indexes() {
        let pool = ConnectionPool::new();
        let user_id = Uuid::new_v4();
        let conn = handle(user_id, UserRole::Student);
        pool.add(conn.clone());

        assert_eq!(pool.connection_count(), 1);
        assert_eq!(pool.user_count(), 1);
        assert_eq!(pool.user_connections(&user_id).len(), 1);

        pool.remove(&conn.id);
        assert_eq!(pool.connection_count(), 0);
        assert_eq!(pool.user_count(), 0);
        assert!(pool.user_connections(&user_id).is_empty());
    }

    #[test]
    fn test_user_keeps_other_connections_after_one_removal() {
        let pool = ConnectionPool::new();
        let user_id = Uuid::new_v4();
        let first = handle(user_id, UserRole::Student);
        let second = handle(user_id, UserRole::Student);
        pool.add(first.clone());
        pool.add(second);

        pool.remove(&first.id);
        assert_eq!(pool.user_connections(&user_id).len(), 1);
        assert_eq!(pool.user_count(), 1);
    }

    #[test]
    fn test_staff_connections_filters_by_role() {
        let pool = ConnectionPool::new();
        pool.add(handle(Uuid::new_v4(), UserRole::Admin));
        pool.add(handle(Uuid::new_v4(), UserRole::Staff));
        pool.add(handle(Uuid::new_v4(), UserRole::Student));

        assert_eq!(pool.staff_connections().len(), 2);
    }
}
