//! Service lifecycle actions with optimistic desired state.

use crate::core::{
    domain::{
        error::ConsoleResult,
        model::{instance::Instance, service::Service},
        value_object::DesiredState,
    },
    infrastructure::api_client::ApiClient,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Issues start/stop/restart and kill requests.
///
/// The service's desired state flips before the request is sent so the UI
/// reflects the intent immediately. If the backend rejects the request the
/// previous desired state is restored.
#[derive(Debug, Clone)]
pub struct ServiceActions {
    api: Arc<ApiClient>,
}

impl ServiceActions {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn start_service(&self, service: &Service, skip_children: bool) -> ConsoleResult<()> {
        self.transition(service, DesiredState::Started, "startService", skip_children)
            .await
    }

    pub async fn stop_service(&self, service: &Service, skip_children: bool) -> ConsoleResult<()> {
        self.transition(service, DesiredState::Stopped, "stopService", skip_children)
            .await
    }

    pub async fn restart_service(
        &self,
        service: &Service,
        skip_children: bool,
    ) -> ConsoleResult<()> {
        self.transition(service, DesiredState::Restarting, "restartService", skip_children)
            .await
    }

    /// Undoes a scheduling transition that has not completed yet.
    ///
    /// Returns `Ok(false)` when the service has nothing pending.
    pub async fn cancel_pending(&self, service: &Service) -> ConsoleResult<bool> {
        match service.current_state().as_deref() {
            Some("pending_start") => self.stop_service(service, false).await.map(|_| true),
            Some("pending_stop") | Some("pending_restart") => {
                self.start_service(service, false).await.map(|_| true)
            }
            _ => Ok(false),
        }
    }

    /// Kills one running instance. The backend reschedules it.
    pub async fn kill_instance(&self, instance: &Instance) -> ConsoleResult<()> {
        let model = instance.model();
        let path = format!(
            "/hosts/{}/{}-{}",
            model.host_id, model.service_id, model.instance_id
        );
        self.api.delete(&path).await?;
        instance.touch();
        info!(
            service = %model.service_id,
            instance = model.instance_id,
            host = %model.host_id,
            "Instance killed"
        );
        Ok(())
    }

    async fn transition(
        &self,
        service: &Service,
        state: DesiredState,
        action: &str,
        skip_children: bool,
    ) -> ConsoleResult<()> {
        let path = if skip_children {
            format!("/services/{}/{}?auto=false", service.id(), action)
        } else {
            format!("/services/{}/{}", service.id(), action)
        };

        let previous = service.set_desired_state(state);
        match self.api.put::<()>(&path, None).await {
            Ok(()) => {
                info!(service = %service.id(), action, "Service action accepted");
                Ok(())
            }
            Err(e) => {
                service.set_desired_state(previous);
                warn!(
                    service = %service.id(),
                    action,
                    error = %e,
                    "Service action failed; desired state restored"
                );
                Err(e)
            }
        }
    }
}
