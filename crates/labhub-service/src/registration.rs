//! Computer registration with best-effort hardware identity attachment.

use std::sync::Arc;

use tracing::info;

use labhub_core::error::AppError;
use labhub_core::result::AppResult;
use labhub_core::traits::IdentityResolver;
use labhub_database::repositories::traits::{ComputerStore, RoomStore};
use labhub_entity::computer::Computer;

/// Registers new lab computers.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    computers: Arc<dyn ComputerStore>,
    rooms: Arc<dyn RoomStore>,
    identity: Arc<dyn IdentityResolver>,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(
        computers: Arc<dyn ComputerStore>,
        rooms: Arc<dyn RoomStore>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            computers,
            rooms,
            identity,
        }
    }

    /// Register a computer.
    ///
    /// When no MAC is supplied, tries to resolve one from the client IP;
    /// resolution failure registers the computer without a MAC. A MAC that
    /// is already registered is a conflict.
    pub async fn register(
        &self,
        name: &str,
        room_id: Option<uuid::Uuid>,
        mac_address: Option<String>,
        client_ip: Option<&str>,
    ) -> AppResult<Computer> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field("name"));
        }
        if let Some(room_id) = room_id {
            if self.rooms.find_by_id(room_id).await?.is_none() {
                return Err(AppError::not_found(format!("Room {room_id} not found")));
            }
        }

        let mac = match mac_address {
            Some(mac) => Some(mac.to_lowercase()),
            None => match client_ip {
                Some(ip) => self.identity.resolve(ip).await,
                None => None,
            },
        };

        if let Some(mac) = mac.as_deref() {
            if self.computers.find_by_mac(mac).await?.is_some() {
                return Err(AppError::conflict(format!(
                    "A computer with MAC address '{mac}' is already registered"
                )));
            }
        }

        let computer = self.computers.create(name, mac.as_deref(), room_id).await?;
        info!(
            computer_id = %computer.id,
            name = %computer.name,
            has_mac = computer.mac_address.is_some(),
            "Computer registered"
        );
        Ok(computer)
    }
}
