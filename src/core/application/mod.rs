//! Use cases built on the transport and the domain.

pub mod health_monitor;
pub mod service_actions;

pub use health_monitor::{HealthMonitor, HealthSource};
pub use service_actions::ServiceActions;
