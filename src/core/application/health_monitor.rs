//! Fetches health telemetry and evaluates it against the known services.

use crate::core::domain::{
    error::ConsoleResult,
    health::{HealthConfig, HealthReport, ServiceHealthTarget, evaluate_services},
    model::{health_check::HealthPayload, service::Service},
};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Where health payloads come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn fetch_health(&self) -> ConsoleResult<HealthPayload>;
}

/// Runs evaluation passes and keeps the most recent report.
pub struct HealthMonitor {
    source: Arc<dyn HealthSource>,
    config: HealthConfig,
    last: RwLock<Option<Arc<HealthReport>>>,
}

impl HealthMonitor {
    pub fn new(source: Arc<dyn HealthSource>, config: HealthConfig) -> Self {
        Self {
            source,
            config,
            last: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Fetches the payload once and evaluates every service against it.
    ///
    /// A failed fetch returns the error and keeps the previous report.
    pub async fn evaluate(&self, services: &[Arc<Service>]) -> ConsoleResult<Arc<HealthReport>> {
        let payload = match self.source.fetch_health().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Health fetch failed");
                return Err(e);
            }
        };

        let targets = services
            .iter()
            .map(|service| ServiceHealthTarget::from(service.as_ref()));
        let report = Arc::new(evaluate_services(targets, &payload, &self.config));
        debug!(
            services = services.len(),
            statuses = report.len(),
            timestamp = report.timestamp(),
            "Health evaluated"
        );

        *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&report));
        Ok(report)
    }

    /// The report of the last successful pass.
    pub fn latest(&self) -> Option<Arc<HealthReport>> {
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
