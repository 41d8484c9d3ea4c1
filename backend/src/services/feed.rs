//! Feed sync: mirrors the feed repository into the [`Dashboard`].
//!
//! Every repository revision triggers one full re-read (live counts plus the
//! complete history list). A failed read is logged and the previous
//! dashboard contents stay in place until the next revision.
//!
//! [`Dashboard`]: crate::services::dashboard::Dashboard

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::db::repository::{FeedRepository, RepositoryResult};
use crate::services::dashboard::SharedDashboard;

/// Read the complete feed once and apply it to `dashboard`.
///
/// # Returns
/// The dashboard revision after the update.
pub async fn sync_once<R: FeedRepository + ?Sized>(
    repo: &R,
    dashboard: &SharedDashboard,
) -> RepositoryResult<u64> {
    let counts = repo
        .area_counts()
        .await
        .map_err(|e| e.with_operation("sync_once"))?;
    let snapshot = repo
        .history_snapshot()
        .await
        .map_err(|e| e.with_operation("sync_once"))?;

    let revision = dashboard.write().apply_feed(&counts, &snapshot);
    Ok(revision)
}

/// Start the background task that keeps `dashboard` in sync with `repo`.
///
/// Syncs immediately, then once per repository revision. The returned
/// receiver yields the dashboard revision after each successful sync.
pub fn spawn_feed_sync(
    repo: Arc<dyn FeedRepository>,
    dashboard: SharedDashboard,
) -> (JoinHandle<()>, watch::Receiver<u64>) {
    let mut changes = repo.subscribe();
    let (updates_tx, updates_rx) = watch::channel(dashboard.read().revision());

    let handle = tokio::spawn(async move {
        info!("Feed sync started");
        loop {
            let feed_revision = *changes.borrow_and_update();
            match sync_once(repo.as_ref(), &dashboard).await {
                Ok(revision) => {
                    debug!(
                        "Dashboard revision {} applied from feed revision {}",
                        revision, feed_revision
                    );
                    updates_tx.send_replace(revision);
                }
                Err(e) => warn!(
                    "Feed sync failed at feed revision {} (retryable: {}): {}",
                    feed_revision,
                    e.is_retryable(),
                    e
                ),
            }

            if changes.changed().await.is_err() {
                info!("Feed closed, stopping sync");
                break;
            }
        }
    });

    (handle, updates_rx)
}
