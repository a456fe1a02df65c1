//! The id → entity store behind a synchronizer.
//!
//! Reconciliation is split in two steps. [`Collection::plan`] is a pure diff of
//! the current ids against a fresh snapshot. [`Collection::apply`] performs the
//! inserts, in-place refreshes and removals in one go.

use crate::core::domain::model::entity::{Entity, EntityModel};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A full collection as returned by the backend, keyed by entity id.
pub type Snapshot<M> = BTreeMap<String, M>;

/// Changes needed to bring a collection in line with a snapshot.
#[derive(Debug)]
pub struct Reconciliation<M: EntityModel> {
    /// Existing entities and their new snapshot.
    pub updated: Vec<(Arc<Entity<M>>, M)>,
    /// Ids seen for the first time, in snapshot order.
    pub created: Vec<(String, M)>,
    /// Ids absent from the snapshot.
    pub removed: Vec<String>,
}

/// Counts of what a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

/// Map and list views over the same entities.
///
/// Every id in the map has exactly one entry in the list, and the reverse.
#[derive(Debug)]
pub struct Collection<M: EntityModel> {
    map: HashMap<String, Arc<Entity<M>>>,
    list: Vec<Arc<Entity<M>>>,
}

impl<M: EntityModel> Default for Collection<M> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            list: Vec::new(),
        }
    }
}

impl<M: EntityModel> Collection<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs the collection against a snapshot without changing anything.
    pub fn plan(&self, snapshot: Snapshot<M>) -> Reconciliation<M> {
        let mut updated = Vec::new();
        let mut created = Vec::new();

        let removed = self
            .map
            .keys()
            .filter(|id| !snapshot.contains_key(id.as_str()))
            .cloned()
            .collect();

        for (id, model) in snapshot {
            match self.map.get(&id) {
                Some(entity) => updated.push((Arc::clone(entity), model)),
                None => created.push((id, model)),
            }
        }

        Reconciliation {
            updated,
            created,
            removed,
        }
    }

    /// Applies a plan produced by [`plan`](Self::plan).
    pub fn apply(&mut self, plan: Reconciliation<M>) -> SyncSummary {
        let summary = SyncSummary {
            created: plan.created.len(),
            updated: plan.updated.len(),
            removed: plan.removed.len(),
        };

        for (entity, model) in plan.updated {
            entity.update(model);
        }

        let gone: Vec<Arc<Entity<M>>> = plan
            .removed
            .iter()
            .filter_map(|id| self.map.remove(id))
            .collect();
        if !gone.is_empty() {
            self.list
                .retain(|entity| !gone.iter().any(|g| Arc::ptr_eq(g, entity)));
        }

        for (id, model) in plan.created {
            let entity = Arc::new(Entity::new(model));
            self.list.push(Arc::clone(&entity));
            self.map.insert(id, entity);
        }

        summary
    }

    /// Plans and applies in one step.
    pub fn reconcile(&mut self, snapshot: Snapshot<M>) -> SyncSummary {
        let plan = self.plan(snapshot);
        self.apply(plan)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Entity<M>>> {
        self.map.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    /// Entities in discovery order.
    pub fn list(&self) -> &[Arc<Entity<M>>] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn assert_in_sync(&self) {
        assert_eq!(self.map.len(), self.list.len());
        for entity in &self.list {
            let mapped = self
                .map
                .values()
                .find(|candidate| Arc::ptr_eq(candidate, entity));
            assert!(mapped.is_some(), "{} is listed but not mapped", entity.id());
        }
    }
}
