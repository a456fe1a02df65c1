//! Polling synchronizer that keeps a local collection in line with a backend
//! endpoint.
//!
//! # Example
//!
//! ```ignore
//! let hosts = client.hosts();
//! hosts.update().await?;          // one explicit refresh
//! hosts.activate();               // refresh every poll period
//! let alpha = hosts.get("h1");
//! hosts.deactivate();
//! ```

use crate::core::{
    domain::{
        error::ConsoleResult, model::entity::Entity, value_object::PollFrequency,
    },
    sync::{
        collection::{Collection, SyncSummary},
        source::CollectionSource,
    },
};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::time::SystemTime;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of the most recent refresh attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatus {
    /// Number of completed attempts, successful or not.
    pub generation: u64,
    /// When the last attempt completed.
    pub last_update: Option<SystemTime>,
    /// Error message of the last attempt, if it failed.
    pub last_error: Option<String>,
}

struct Poller {
    shutdown: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
}

struct Shared<S: CollectionSource> {
    name: String,
    source: S,
    collection: RwLock<Collection<S::Model>>,
    status: watch::Sender<SyncStatus>,
    frequency: Mutex<PollFrequency>,
    poller: Mutex<Option<Poller>>,
}

impl<S: CollectionSource> Shared<S> {
    async fn update(&self) -> ConsoleResult<SyncSummary> {
        // Nothing is locked while the fetch is in flight. Overlapping updates
        // each reconcile their own snapshot; the last one to finish wins.
        let outcome = self.source.fetch().await.map(|snapshot| {
            self.collection
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .reconcile(snapshot)
        });

        match &outcome {
            Ok(summary) => debug!(
                collection = %self.name,
                created = summary.created,
                updated = summary.updated,
                removed = summary.removed,
                "Collection reconciled"
            ),
            Err(e) => debug!(collection = %self.name, error = %e, "Collection fetch failed"),
        }

        self.status.send_modify(|status| {
            status.generation += 1;
            status.last_update = Some(SystemTime::now());
            status.last_error = outcome.as_ref().err().map(ToString::to_string);
        });

        outcome
    }

    fn stop_polling(&self) -> bool {
        let poller = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match poller {
            Some(poller) => {
                poller.shutdown.cancel();
                true
            }
            None => false,
        }
    }
}

impl<S: CollectionSource> Drop for Shared<S> {
    fn drop(&mut self) {
        self.stop_polling();
    }
}

/// Keeps an id → entity map and its companion list eventually consistent with
/// a [`CollectionSource`].
///
/// Cloning is cheap and every clone drives the same collection.
pub struct Synchronizer<S: CollectionSource> {
    shared: Arc<Shared<S>>,
}

impl<S: CollectionSource> Clone for Synchronizer<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: CollectionSource> Synchronizer<S> {
    /// Creates an inactive synchronizer with an empty collection.
    pub fn new(name: impl Into<String>, source: S, frequency: PollFrequency) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                source,
                collection: RwLock::new(Collection::new()),
                status,
                frequency: Mutex::new(frequency),
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Fetches the full collection once and reconciles it.
    ///
    /// On failure the error is returned and the collection is left untouched.
    /// An empty response is valid and clears the collection.
    pub async fn update(&self) -> ConsoleResult<SyncSummary> {
        self.shared.update().await
    }

    /// Starts polling, or restarts the timer if already polling.
    ///
    /// The first scheduled refresh happens one period from now. Must be called
    /// from within a tokio runtime.
    pub fn activate(&self) {
        let period = self.poll_frequency().period();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(poll(
            Arc::downgrade(&self.shared),
            period,
            shutdown.clone(),
        ));

        let previous = self
            .shared
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Poller { shutdown, handle });
        if let Some(previous) = previous {
            previous.shutdown.cancel();
        }

        info!(
            collection = %self.shared.name,
            period_ms = period.as_millis() as u64,
            "Polling activated"
        );
    }

    /// Stops polling. A refresh already in flight is allowed to finish.
    pub fn deactivate(&self) {
        if self.shared.stop_polling() {
            info!(collection = %self.shared.name, "Polling deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.shared
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|poller| !poller.handle.is_finished())
    }

    pub fn poll_frequency(&self) -> PollFrequency {
        *self
            .shared
            .frequency
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the poll period. An active poller is restarted with it.
    pub fn set_poll_frequency(&self, frequency: PollFrequency) {
        *self
            .shared
            .frequency
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = frequency;
        if self.is_active() {
            self.activate();
        }
    }

    /// Local lookup; never fetches.
    pub fn get(&self, id: &str) -> Option<Arc<Entity<S::Model>>> {
        self.read(|collection| collection.get(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read(|collection| collection.contains(id))
    }

    /// Entities in discovery order.
    pub fn list(&self) -> Vec<Arc<Entity<S::Model>>> {
        self.read(|collection| collection.list().to_vec())
    }

    pub fn len(&self) -> usize {
        self.read(Collection::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(Collection::is_empty)
    }

    pub fn status(&self) -> SyncStatus {
        self.shared.status.borrow().clone()
    }

    /// Watches the outcome of every completed refresh.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.shared.status.subscribe()
    }

    /// Resolves once the first refresh attempt has completed.
    pub async fn ready(&self) {
        let mut status = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = status.wait_for(|status| status.generation > 0).await;
    }

    fn read<R>(&self, f: impl FnOnce(&Collection<S::Model>) -> R) -> R {
        f(&self
            .shared
            .collection
            .read()
            .unwrap_or_else(PoisonError::into_inner))
    }

    #[cfg(test)]
    pub(crate) fn assert_in_sync(&self) {
        self.read(Collection::assert_in_sync);
    }
}

async fn poll<S: CollectionSource>(
    shared: Weak<Shared<S>>,
    period: std::time::Duration,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first immediate tick
    interval.tick().await;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            _ = interval.tick() => {
                let Some(shared) = shared.upgrade() else { break };
                if let Err(e) = shared.update().await {
                    warn!(collection = %shared.name, error = %e, "Scheduled refresh failed");
                }
            }
        }
    }
}
