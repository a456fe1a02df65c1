//! Locally cached wrappers around backend resources.
//!
//! An [`Entity`] keeps one immutable snapshot of the last fetched backend
//! representation. Refreshing an entity swaps the snapshot in place, so the
//! `Arc<Entity<_>>` handed out to readers stays valid across polls.

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

/// A raw backend model that can be wrapped in an [`Entity`].
pub trait EntityModel: DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Client-side state that lives next to the snapshot, e.g. an optimistic
    /// desired state. It survives refreshes unless [`sync_local`] resets it.
    ///
    /// [`sync_local`]: EntityModel::sync_local
    type Local: fmt::Debug + Default + Send + Sync + 'static;

    /// The stable backend identifier.
    fn id(&self) -> String;

    /// Called after every snapshot swap.
    fn sync_local(&self, _local: &mut Self::Local) {}
}

#[derive(Debug)]
struct EntityState<M: EntityModel> {
    model: Arc<M>,
    local: M::Local,
    last_update: SystemTime,
}

/// A backend resource with a stable identity.
pub struct Entity<M: EntityModel> {
    id: String,
    state: RwLock<EntityState<M>>,
}

impl<M: EntityModel> Entity<M> {
    pub fn new(model: M) -> Self {
        let mut local = M::Local::default();
        model.sync_local(&mut local);
        Self {
            id: model.id(),
            state: RwLock::new(EntityState {
                model: Arc::new(model),
                local,
                last_update: SystemTime::now(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current snapshot.
    pub fn model(&self) -> Arc<M> {
        Arc::clone(&self.read().model)
    }

    /// Time of the last local mutation.
    pub fn last_update(&self) -> SystemTime {
        self.read().last_update
    }

    /// Replaces the snapshot wholesale and refreshes local state.
    pub fn update(&self, model: M) {
        debug_assert_eq!(model.id(), self.id, "entity id is immutable");
        let mut state = self.write();
        model.sync_local(&mut state.local);
        state.model = Arc::new(model);
        state.last_update = SystemTime::now();
    }

    /// Marks the entity as changed without touching its snapshot.
    pub fn touch(&self) {
        self.write().last_update = SystemTime::now();
    }

    /// Reads the client-side state.
    pub fn local<R>(&self, f: impl FnOnce(&M::Local) -> R) -> R {
        f(&self.read().local)
    }

    /// Mutates the client-side state and touches the entity.
    pub(crate) fn update_local<R>(&self, f: impl FnOnce(&mut M::Local) -> R) -> R {
        let mut state = self.write();
        let result = f(&mut state.local);
        state.last_update = SystemTime::now();
        result
    }

    fn read(&self) -> RwLockReadGuard<'_, EntityState<M>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EntityState<M>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M: EntityModel> fmt::Debug for Entity<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("model", &state.model)
            .field("local", &state.local)
            .finish()
    }
}
