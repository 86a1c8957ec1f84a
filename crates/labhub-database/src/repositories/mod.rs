//! Repository traits and their PostgreSQL implementations.

pub mod computer;
pub mod heartbeat;
pub mod notification;
pub mod room;
pub mod traits;
pub mod user;

pub use computer::ComputerRepository;
pub use heartbeat::HeartbeatRepository;
pub use notification::NotificationRepository;
pub use room::RoomRepository;
pub use traits::{ComputerStore, HeartbeatStore, NotificationStore, RoomStore, UserStore};
pub use user::UserRepository;
