mod core;

#[cfg(test)]
mod tests;

pub use crate::core::{
    application::{HealthMonitor, HealthSource, ServiceActions},
    config::{ClientConfig, RateLimitConfig},
    domain::{
        error::{ConsoleError, ConsoleResult, ValidationError},
        health::{
            CheckVerdict, HealthConfig, HealthReport, HealthState, ServiceHealthTarget, Status,
            StatusDescription, StatusRollup, classify_health_check, evaluate_health_check,
            evaluate_instance, evaluate_instance_status, evaluate_service,
            evaluate_service_status, evaluate_services,
        },
        model::{
            entity::{Entity, EntityModel},
            health_check::{CheckStatus, HealthCheckResult, HealthPayload},
            host::{Host, HostModel},
            instance::{Instance, InstanceModel},
            pool::{Pool, PoolModel},
            server_config::ServerConfig,
            service::{Service, ServiceLocal, ServiceModel, ServiceType},
        },
        value_object::{
            ControlPlaneHost, ControlPlanePort, ControlPlaneUrl, DesiredState, PollFrequency,
        },
    },
    infrastructure::{ApiClient, CollectionShape, HttpCollection},
    sync::{
        Collection, CollectionSource, Reconciliation, Snapshot, SyncStatus, SyncSummary,
        Synchronizer,
    },
};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

pub type HostSynchronizer = Synchronizer<HttpCollection<HostModel>>;
pub type PoolSynchronizer = Synchronizer<HttpCollection<PoolModel>>;
pub type ServiceSynchronizer = Synchronizer<HttpCollection<ServiceModel>>;
pub type InstanceSynchronizer = Synchronizer<HttpCollection<InstanceModel>>;

/// A client for the control plane console backend.
///
/// It owns one synchronizer per top-level collection, the service actions
/// and the health monitor, all sharing one transport.
///
/// # Examples
///
/// ```no_run
/// use controlplane_console::{ControlPlaneClient, ConsoleResult};
///
/// #[tokio::main]
/// async fn main() -> ConsoleResult<()> {
///     let client = ControlPlaneClient::builder()
///         .host("controlplane.example.com")?
///         .port(443)?
///         .secure(true)
///         .build()?;
///
///     client.load_server_config().await.ok();
///     client.services().update().await?;
///     client.services().activate();
///
///     let report = client.evaluate_health().await?;
///     for service in client.services().list() {
///         println!("{}: {}", service.name(), report.get(service.id()).status);
///     }
///     Ok(())
/// }
/// ```
pub struct ControlPlaneClient {
    api: Arc<ApiClient>,
    hosts: HostSynchronizer,
    pools: PoolSynchronizer,
    services: ServiceSynchronizer,
    actions: ServiceActions,
    health: HealthMonitor,
    poll_frequency: Mutex<PollFrequency>,
}

/// Builder for ControlPlaneClient configuration
#[derive(Debug, Default)]
pub struct ControlPlaneClientBuilder {
    host: Option<ControlPlaneHost>,
    port: Option<ControlPlanePort>,
    base_url: Option<ControlPlaneUrl>,
    secure: bool,
    config: ClientConfig,
}

impl ControlPlaneClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> ConsoleResult<Self> {
        self.host = Some(ControlPlaneHost::new(host)?);
        Ok(self)
    }

    pub fn port(mut self, port: u16) -> ConsoleResult<Self> {
        self.port = Some(ControlPlanePort::new(port)?);
        Ok(self)
    }

    /// Uses a full base URL instead of host, port and scheme.
    pub fn base_url(mut self, url: &str) -> ConsoleResult<Self> {
        self.base_url = Some(ControlPlaneUrl::parse(url)?);
        Ok(self)
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn poll_frequency(mut self, period: Duration) -> ConsoleResult<Self> {
        self.config.poll_frequency = PollFrequency::new(period)?;
        Ok(self)
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn health(mut self, health: HealthConfig) -> Self {
        self.config.health = health;
        self
    }

    pub fn build(self) -> ConsoleResult<ControlPlaneClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => {
                let host = self.host.ok_or_else(|| ValidationError::Field {
                    field: "host".to_string(),
                    message: "Host is required".to_string(),
                })?;
                let port = self
                    .port
                    .unwrap_or(ControlPlanePort::new_unchecked(ControlPlanePort::DEFAULT));
                ControlPlaneUrl::from_parts(&host, &port, self.secure)?
            }
        };

        let api = Arc::new(ApiClient::new(base_url, &self.config)?);
        let frequency = self.config.poll_frequency;

        Ok(ControlPlaneClient {
            hosts: Synchronizer::new(
                "hosts",
                HttpCollection::new(Arc::clone(&api), "/hosts", CollectionShape::Map),
                frequency,
            ),
            pools: Synchronizer::new(
                "pools",
                HttpCollection::new(Arc::clone(&api), "/pools", CollectionShape::Map),
                frequency,
            ),
            services: Synchronizer::new(
                "services",
                HttpCollection::new(Arc::clone(&api), "/services", CollectionShape::Map),
                frequency,
            ),
            actions: ServiceActions::new(Arc::clone(&api)),
            health: HealthMonitor::new(
                Arc::clone(&api) as Arc<dyn HealthSource>,
                self.config.health,
            ),
            poll_frequency: Mutex::new(frequency),
            api,
        })
    }
}

impl ControlPlaneClient {
    /// Creates a new builder for ControlPlaneClient configuration
    pub fn builder() -> ControlPlaneClientBuilder {
        ControlPlaneClientBuilder::default()
    }

    pub fn base_url(&self) -> &ControlPlaneUrl {
        self.api.base_url()
    }

    pub fn hosts(&self) -> &HostSynchronizer {
        &self.hosts
    }

    pub fn pools(&self) -> &PoolSynchronizer {
        &self.pools
    }

    pub fn services(&self) -> &ServiceSynchronizer {
        &self.services
    }

    /// Looks up a locally known service, e.g. before running an action on it.
    pub fn service(&self, id: &str) -> ConsoleResult<Arc<Service>> {
        self.services
            .get(id)
            .ok_or_else(|| ConsoleError::NotFound(format!("service {}", id)))
    }

    /// Creates an inactive synchronizer for the instances of one service.
    pub fn instances_for(&self, service_id: &str) -> InstanceSynchronizer {
        Synchronizer::new(
            format!("instances:{}", service_id),
            HttpCollection::new(
                Arc::clone(&self.api),
                format!("/api/v2/services/{}/instances", service_id),
                CollectionShape::List,
            ),
            self.poll_frequency(),
        )
    }

    pub fn actions(&self) -> &ServiceActions {
        &self.actions
    }

    pub fn health(&self) -> &HealthMonitor {
        &self.health
    }

    /// Evaluates health for every service currently in the local collection.
    pub async fn evaluate_health(&self) -> ConsoleResult<Arc<HealthReport>> {
        self.health.evaluate(&self.services.list()).await
    }

    /// Current default poll period, used by synchronizers created from now on.
    pub fn poll_frequency(&self) -> PollFrequency {
        *self
            .poll_frequency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the server's console settings and applies its poll period.
    ///
    /// The period becomes the client default and is pushed to the hosts, pools
    /// and services synchronizers. On failure the current period stays in place.
    pub async fn load_server_config(&self) -> ConsoleResult<PollFrequency> {
        let loaded = match self.api.get::<ServerConfig>("/config").await {
            Ok(config) => PollFrequency::from_secs(config.poll_frequency).map_err(ConsoleError::from),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(frequency) => {
                *self
                    .poll_frequency
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = frequency;
                self.hosts.set_poll_frequency(frequency);
                self.pools.set_poll_frequency(frequency);
                self.services.set_poll_frequency(frequency);
                info!(
                    period_ms = frequency.period().as_millis() as u64,
                    "Server config loaded"
                );
                Ok(frequency)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    period_ms = self.poll_frequency().period().as_millis() as u64,
                    "Failed to load server config; keeping current poll frequency"
                );
                Err(e)
            }
        }
    }
}
