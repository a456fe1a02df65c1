//! Wire models for the `/servicehealth` endpoint.

use crate::core::domain::value_object::serde_helpers::{null_as_default, positive_or_none};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw status reported by a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Unknown,
    /// Any value this client does not know, e.g. `timeout`.
    #[serde(other)]
    Other,
}

/// The last report of one named check on one instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheckResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    /// Last time the check reported, in seconds.
    #[serde(default)]
    pub timestamp: f64,
    /// Expected seconds between two reports.
    #[serde(default)]
    pub interval: f64,
    /// Instance start time in seconds; absent until the instance started.
    #[serde(
        default,
        deserialize_with = "positive_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<f64>,
}

/// Checks of one instance, keyed by check name.
pub type InstanceChecks = BTreeMap<String, HealthCheckResult>;

/// Instances of one service, keyed by instance id.
pub type ServiceChecks = BTreeMap<String, InstanceChecks>;

/// The whole health payload: service id → instance id → check name → result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub statuses: BTreeMap<String, ServiceChecks>,
    /// Server time the payload was produced, in seconds.
    #[serde(default)]
    pub timestamp: f64,
}

impl HealthPayload {
    /// Returns the instance checks reported for a service, if any.
    pub fn service(&self, service_id: &str) -> Option<&ServiceChecks> {
        self.statuses.get(service_id)
    }
}
