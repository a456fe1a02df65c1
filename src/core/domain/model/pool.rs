//! Domain model for resource pools from the `/pools` endpoint.

use crate::core::domain::model::entity::{Entity, EntityModel};
use serde::{Deserialize, Serialize};

/// A resource pool grouping hosts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoolModel {
    /// Unique identifier, e.g. `default`.
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub realm: String,
    #[serde(default)]
    pub description: String,
    /// Sum of cores on all hosts in the pool.
    #[serde(default)]
    pub core_capacity: u32,
    /// Sum of RAM on all hosts in the pool, in bytes.
    #[serde(default)]
    pub memory_capacity: u64,
    /// RAM committed to services, in bytes.
    #[serde(default)]
    pub memory_commitment: u64,
}

impl EntityModel for PoolModel {
    type Local = ();

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// A cached resource pool.
pub type Pool = Entity<PoolModel>;

impl Entity<PoolModel> {
    pub fn description(&self) -> String {
        self.model().description.clone()
    }

    /// Committed memory as a fraction of capacity, `None` for an empty pool.
    pub fn memory_usage(&self) -> Option<f64> {
        let model = self.model();
        (model.memory_capacity > 0)
            .then(|| model.memory_commitment as f64 / model.memory_capacity as f64)
    }
}
