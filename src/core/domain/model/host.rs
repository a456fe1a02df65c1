//! Domain model for hosts from the `/hosts` endpoint.

use crate::core::domain::model::entity::{Entity, EntityModel};
use serde::{Deserialize, Serialize};

/// A host registered with the control plane.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostModel {
    /// Unique identifier, defaults to the host id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Human label, e.g. the hostname.
    #[serde(default)]
    pub name: String,
    /// Pool the host belongs to.
    #[serde(rename = "PoolID", default)]
    pub pool_id: String,
    /// Address the master reaches the host at.
    #[serde(rename = "IPAddr", default)]
    pub ip_addr: String,
    #[serde(rename = "RPCPort", default)]
    pub rpc_port: u16,
    /// Cores available to the platform.
    #[serde(default)]
    pub cores: u32,
    /// RAM available to the platform, in bytes.
    #[serde(default)]
    pub memory: u64,
    /// RAM limit set by the user (size or percentage).
    #[serde(rename = "RAMLimit", default, skip_serializing_if = "Option::is_none")]
    pub ram_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_release: Option<String>,
}

impl EntityModel for HostModel {
    type Local = ();

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// A cached host.
pub type Host = Entity<HostModel>;

impl Entity<HostModel> {
    pub fn name(&self) -> String {
        self.model().name.clone()
    }

    pub fn pool_id(&self) -> String {
        self.model().pool_id.clone()
    }

    pub fn ip_addr(&self) -> String {
        self.model().ip_addr.clone()
    }

    pub fn cores(&self) -> u32 {
        self.model().cores
    }

    pub fn memory(&self) -> u64 {
        self.model().memory
    }
}
