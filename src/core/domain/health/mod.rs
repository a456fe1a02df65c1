//! Health status evaluation.
//!
//! Raw check telemetry is turned into `good`/`bad`/`down`/`unknown` per check,
//! rolled up per instance, then per service. Every function here is pure; the
//! payload is fetched elsewhere and passed in.

mod evaluator;
mod status;

pub use evaluator::{
    CheckVerdict, HealthConfig, HealthReport, ServiceHealthTarget, classify_health_check,
    evaluate_health_check, evaluate_instance, evaluate_instance_status, evaluate_service,
    evaluate_service_status, evaluate_services,
};
pub use status::{HealthState, Status, StatusDescription, StatusRollup};
