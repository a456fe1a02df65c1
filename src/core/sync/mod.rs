//! Poll-based collection synchronization.

pub mod collection;
pub mod source;
pub mod synchronizer;

pub use collection::{Collection, Reconciliation, Snapshot, SyncSummary};
pub use source::CollectionSource;
pub use synchronizer::{SyncStatus, Synchronizer};
