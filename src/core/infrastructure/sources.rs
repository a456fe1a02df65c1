//! HTTP-backed sources for synchronizers and the health monitor.

use crate::core::{
    application::health_monitor::HealthSource,
    domain::{
        error::ConsoleResult,
        model::{entity::EntityModel, health_check::HealthPayload},
    },
    infrastructure::api_client::ApiClient,
    sync::{collection::Snapshot, source::CollectionSource},
};
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// How an endpoint lays out its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    /// `{ "<id>": { ... }, ... }`, keyed by the response key.
    Map,
    /// `[ { ... }, ... ]`, keyed by [`EntityModel::id`].
    List,
}

/// A collection fetched with a single GET request.
pub struct HttpCollection<M> {
    api: Arc<ApiClient>,
    path: String,
    shape: CollectionShape,
    _model: PhantomData<fn() -> M>,
}

impl<M> HttpCollection<M> {
    pub fn new(api: Arc<ApiClient>, path: impl Into<String>, shape: CollectionShape) -> Self {
        Self {
            api,
            path: path.into(),
            shape,
            _model: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<M> fmt::Debug for HttpCollection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCollection")
            .field("path", &self.path)
            .field("shape", &self.shape)
            .finish()
    }
}

#[async_trait]
impl<M: EntityModel> CollectionSource for HttpCollection<M> {
    type Model = M;

    async fn fetch(&self) -> ConsoleResult<Snapshot<M>> {
        match self.shape {
            CollectionShape::Map => {
                let snapshot: Option<Snapshot<M>> = self.api.get(&self.path).await?;
                Ok(snapshot.unwrap_or_default())
            }
            CollectionShape::List => {
                let items: Option<Vec<M>> = self.api.get(&self.path).await?;
                Ok(items
                    .unwrap_or_default()
                    .into_iter()
                    .map(|model| (model.id(), model))
                    .collect())
            }
        }
    }
}

#[async_trait]
impl HealthSource for ApiClient {
    async fn fetch_health(&self) -> ConsoleResult<HealthPayload> {
        let payload: Option<HealthPayload> = self.get("/servicehealth").await?;
        Ok(payload.unwrap_or_default())
    }
}
