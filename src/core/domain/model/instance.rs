//! Domain model for running service instances from
//! `/api/v2/services/{id}/instances`.

use crate::core::domain::model::entity::{Entity, EntityModel};
use serde::{Deserialize, Serialize};

/// One running container of a service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InstanceModel {
    /// Zero-based slot of the instance within its service.
    #[serde(rename = "InstanceID")]
    pub instance_id: u32,
    #[serde(rename = "ServiceID")]
    pub service_id: String,
    #[serde(rename = "HostID", default)]
    pub host_id: String,
    #[serde(rename = "ContainerID", default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityModel for InstanceModel {
    type Local = ();

    fn id(&self) -> String {
        self.instance_id.to_string()
    }
}

/// A cached service instance.
pub type Instance = Entity<InstanceModel>;

impl Entity<InstanceModel> {
    pub fn instance_id(&self) -> u32 {
        self.model().instance_id
    }

    pub fn service_id(&self) -> String {
        self.model().service_id.clone()
    }

    pub fn host_id(&self) -> String {
        self.model().host_id.clone()
    }
}
