//! Computer entity.

pub mod model;
pub mod status;

pub use model::{Computer, RegisterComputer};
pub use status::ComputerStatus;
