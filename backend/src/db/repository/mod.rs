//! Repository trait for the upstream real-time feed.
//!
//! The feed keeps two things: the live counts of every area, and an
//! append-only history list keyed by push id. Readers always get complete
//! snapshots; [`FeedRepository::subscribe`] tells them when to read again.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::models::{Area, AreaCounts};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Live counts of every known area.
pub type AreaCountsMap = BTreeMap<Area, AreaCounts>;

/// Abstract interface of the real-time feed.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Check whether the feed backend is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` if the backend answers
    /// * `Ok(false)` if it is known to be down
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Overwrite the live counts of one area.
    async fn set_area_counts(&self, area: Area, counts: AreaCounts) -> RepositoryResult<()>;

    /// Live counts of all areas. Areas never written read as 0/0.
    async fn area_counts(&self) -> RepositoryResult<AreaCountsMap>;

    /// Append one raw record to the history list.
    ///
    /// # Returns
    /// The push key of the new record. Keys sort in push order.
    async fn push_history(&self, record: Value) -> RepositoryResult<String>;

    /// Replace the whole history list. Records get fresh push keys in the
    /// order given.
    async fn replace_history(&self, records: Vec<Value>) -> RepositoryResult<usize>;

    /// Complete history list as an object keyed by push id.
    async fn history_snapshot(&self) -> RepositoryResult<Value>;

    /// Revision counter that changes after every mutation.
    fn subscribe(&self) -> watch::Receiver<u64>;
}
