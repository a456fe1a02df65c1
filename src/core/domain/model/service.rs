//! Domain model for deployed services from the `/services` endpoint.

use crate::core::domain::{
    model::entity::{Entity, EntityModel},
    value_object::DesiredState,
};
use serde::{Deserialize, Serialize};

/// A deployed application service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceModel {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Empty for top-level applications.
    #[serde(rename = "ParentServiceID", default)]
    pub parent_service_id: String,
    #[serde(rename = "PoolID", default)]
    pub pool_id: String,
    #[serde(default)]
    pub desired_state: DesiredState,
    /// Backend scheduling state, e.g. `started` or `pending_stop`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
    /// Number of instances the service is declared to run.
    #[serde(default)]
    pub instances: u32,
    /// Startup command; empty for container-only services.
    #[serde(default)]
    pub startup: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub emergency_shutdown: bool,
}

/// Client-side service state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ServiceLocal {
    /// Optimistic desired state; reset from the snapshot on every refresh.
    pub desired_state: DesiredState,
}

impl EntityModel for ServiceModel {
    type Local = ServiceLocal;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn sync_local(&self, local: &mut ServiceLocal) {
        local.desired_state = self.desired_state;
    }
}

/// Classification inferred from a service's definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// Internal platform service.
    Isvc,
    /// Service with no parent.
    App,
    /// Service with children but no startup command.
    Meta,
}

/// A cached service.
pub type Service = Entity<ServiceModel>;

impl Entity<ServiceModel> {
    pub fn name(&self) -> String {
        self.model().name.clone()
    }

    pub fn parent_id(&self) -> Option<String> {
        let model = self.model();
        (!model.parent_service_id.is_empty()).then(|| model.parent_service_id.clone())
    }

    /// The desired state as currently shown to the user, including any
    /// optimistic change not yet confirmed by a refresh.
    pub fn desired_state(&self) -> DesiredState {
        self.local(|local| local.desired_state)
    }

    pub(crate) fn set_desired_state(&self, state: DesiredState) -> DesiredState {
        self.update_local(|local| std::mem::replace(&mut local.desired_state, state))
    }

    pub fn current_state(&self) -> Option<String> {
        self.model().current_state.clone()
    }

    pub fn num_instances(&self) -> u32 {
        self.model().instances
    }

    pub fn service_types(&self) -> Vec<ServiceType> {
        let model = self.model();
        let mut types = Vec::new();
        if model.id.contains("isvc-") {
            types.push(ServiceType::Isvc);
        }
        if model.parent_service_id.is_empty() {
            types.push(ServiceType::App);
        }
        if model.has_children && model.startup.is_empty() {
            types.push(ServiceType::Meta);
        }
        types
    }

    pub fn is_isvc(&self) -> bool {
        self.service_types().contains(&ServiceType::Isvc)
    }

    pub fn is_app(&self) -> bool {
        self.service_types().contains(&ServiceType::App)
    }
}
