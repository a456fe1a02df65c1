//! Client configuration.

use crate::core::domain::{
    error::ValidationError, health::HealthConfig, value_object::PollFrequency,
};
use std::num::NonZeroU32;
use std::time::Duration;

/// Token-bucket limit applied to every outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub(crate) fn quota(&self) -> Result<governor::Quota, ValidationError> {
        let rate = NonZeroU32::new(self.requests_per_second).ok_or_else(|| {
            ValidationError::Field {
                field: "requests_per_second".to_string(),
                message: "Rate must be greater than zero".to_string(),
            }
        })?;
        let burst = NonZeroU32::new(self.burst_size).ok_or_else(|| ValidationError::Field {
            field: "burst_size".to_string(),
            message: "Burst size must be greater than zero".to_string(),
        })?;
        Ok(governor::Quota::per_second(rate).allow_burst(burst))
    }
}

/// Settings shared by the transport, the synchronizers and the health monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Period of scheduled collection refreshes.
    pub poll_frequency: PollFrequency,
    /// Optional client-side rate limit. Disabled by default.
    pub rate_limit: Option<RateLimitConfig>,
    /// Upper bound for a single HTTP request.
    pub request_timeout: Duration,
    /// Accept self-signed certificates.
    pub accept_invalid_certs: bool,
    pub health: HealthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_frequency: PollFrequency::default(),
            rate_limit: None,
            request_timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            health: HealthConfig::default(),
        }
    }
}
