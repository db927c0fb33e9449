//! Port traits at the boundary between the domain and the outside world.

pub mod config_port;
pub mod data_port;
pub mod notify_port;
pub mod prediction_port;
