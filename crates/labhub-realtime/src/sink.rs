//! The transport-side implementation of the presence event sink.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use labhub_core::events::PresenceEvent;
use labhub_core::traits::EventSink;
use labhub_database::repositories::traits::{NotificationStore, UserStore};
use labhub_entity::notification::CreateNotification;

use crate::connection::manager::ConnectionManager;
use crate::message::OutboundMessage;

/// Fans presence events out to live connections and, for offline alerts,
/// persists one notification row per lab staff user.
///
/// Every failure path is logged and swallowed; the publishing heartbeat
/// or sweep never observes a delivery error.
#[derive(Debug)]
pub struct RealtimeSink {
    manager: Arc<ConnectionManager>,
    users: Arc<dyn UserStore>,
    notifications: Arc<dyn NotificationStore>,
    persist_alerts: bool,
}

impl RealtimeSink {
    /// Create a new sink.
    pub fn new(
        manager: Arc<ConnectionManager>,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
        persist_alerts: bool,
    ) -> Self {
        Self {
            manager,
            users,
            notifications,
            persist_alerts,
        }
    }

    async fn persist_alert(&self, event: &PresenceEvent) {
        let PresenceEvent::OfflineAlert {
            computer_id,
            computer_name,
            ..
        } = event
        else {
            return;
        };

        let staff = match self.users.list_lab_staff().await {
            Ok(staff) => staff,
            Err(e) => {
                warn!(error = %e, "Could not list staff for alert persistence");
                return;
            }
        };

        let payload = serde_json::to_value(event).ok();
        for user in staff {
            let result = self
                .notifications
                .create(&CreateNotification {
                    user_id: user.id,
                    category: "presence".to_string(),
                    title: "Computer offline".to_string(),
                    message: format!("{computer_name} stopped responding and was marked offline"),
                    payload: payload.clone(),
                })
                .await;
            if let Err(e) = result {
                warn!(
                    user_id = %user.id,
                    computer_id = %computer_id,
                    error = %e,
                    "Failed to persist offline alert notification"
                );
            }
        }
    }
}

#[async_trait]
impl EventSink for RealtimeSink {
    async fn publish(&self, event: PresenceEvent) {
        let message = OutboundMessage::from(&event);
        let sent = self.manager.send_to_audience(event.audience(), &message);
        debug!(
            computer_id = %event.computer_id(),
            connections = sent,
            "Presence event delivered"
        );

        if self.persist_alerts {
            self.persist_alert(&event).await;
        }
    }
}
