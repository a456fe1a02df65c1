use crate::core::{
    domain::{error::ConsoleResult, model::entity::EntityModel},
    sync::collection::Snapshot,
};
use async_trait::async_trait;

/// Where a synchronizer fetches its collection from.
///
/// Implementations return the complete collection on every call, never a
/// diff. A backend `null` must be returned as an empty snapshot.
#[async_trait]
pub trait CollectionSource: Send + Sync + 'static {
    type Model: EntityModel;

    async fn fetch(&self) -> ConsoleResult<Snapshot<Self::Model>>;
}
