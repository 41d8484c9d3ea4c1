//! In-memory local repository implementation.
//!
//! Stores the live counts and the history list in memory and bumps a
//! revision counter after every write, which is all the dashboard needs from
//! a real-time feed. Used by the server binary and by the tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tokio::sync::watch;
use uuid::Uuid;

use crate::db::repository::{
    AreaCountsMap, ErrorContext, FeedRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Area, AreaCounts};

/// In-memory feed repository.
///
/// Cloning is cheap and every clone shares the same data and revision
/// channel.
///
/// # Example
/// ```
/// use parking_dashboard::db::repositories::LocalRepository;
/// use parking_dashboard::db::repository::FeedRepository;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = LocalRepository::new();
///     repo.push_history(serde_json::json!({"area": "A", "ts": 1})).await.unwrap();
///     assert_eq!(repo.history_len(), 1);
/// }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    revision: Arc<watch::Sender<u64>>,
}

struct LocalData {
    area_counts: AreaCountsMap,
    history: BTreeMap<String, Value>,
    next_push_seq: u64,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            area_counts: Area::ALL
                .iter()
                .map(|area| (*area, AreaCounts::default()))
                .collect(),
            history: BTreeMap::new(),
            next_push_seq: 0,
            is_healthy: true,
        }
    }
}

impl LocalData {
    /// Push keys are a zero-padded sequence number followed by a random
    /// suffix, so lexical order equals push order.
    fn next_push_key(&mut self) -> String {
        let seq = self.next_push_seq;
        self.next_push_seq += 1;
        format!("-{:012}-{}", seq, Uuid::new_v4().simple())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0u64);
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            revision: Arc::new(sender),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository. Health is preserved.
    pub fn clear(&self) {
        {
            let mut data = self.data.write();
            *data = LocalData {
                is_healthy: data.is_healthy,
                ..Default::default()
            };
        }
        self.bump_revision();
    }

    /// Number of records in the history list.
    pub fn history_len(&self) -> usize {
        self.data.read().history.len()
    }

    /// Current revision.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Feed backend is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[async_trait]
impl FeedRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn set_area_counts(&self, area: Area, counts: AreaCounts) -> RepositoryResult<()> {
        self.check_health("set_area_counts")?;
        self.data.write().area_counts.insert(area, counts);
        self.bump_revision();
        Ok(())
    }

    async fn area_counts(&self) -> RepositoryResult<AreaCountsMap> {
        self.check_health("area_counts")?;
        Ok(self.data.read().area_counts.clone())
    }

    async fn push_history(&self, record: Value) -> RepositoryResult<String> {
        self.check_health("push_history")?;
        if !record.is_object() {
            return Err(RepositoryError::validation_with_context(
                "History records must be JSON objects",
                ErrorContext::new("push_history").with_entity("history"),
            ));
        }
        let key = {
            let mut data = self.data.write();
            let key = data.next_push_key();
            data.history.insert(key.clone(), record);
            key
        };
        self.bump_revision();
        Ok(key)
    }

    async fn replace_history(&self, records: Vec<Value>) -> RepositoryResult<usize> {
        self.check_health("replace_history")?;
        let count = records.len();
        {
            let mut data = self.data.write();
            data.history.clear();
            for record in records {
                let key = data.next_push_key();
                data.history.insert(key, record);
            }
        }
        self.bump_revision();
        Ok(count)
    }

    async fn history_snapshot(&self) -> RepositoryResult<Value> {
        self.check_health("history_snapshot")?;
        let data = self.data.read();
        let map: Map<String, Value> = data
            .history
            .iter()
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        Ok(Value::Object(map))
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
