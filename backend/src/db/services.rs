//! High-level feed service layer.
//!
//! Repository-agnostic operations used by the HTTP layer, the feed sync
//! task and the exporter. These functions hold the rules that must not
//! depend on the storage backend, such as the shape of the history record
//! written for every live count update.
//!
//! # Usage
//!
//! ```no_run
//! use parking_dashboard::db::{services, repositories::LocalRepository};
//! use parking_dashboard::models::{Area, AreaCounts, DisplayZone};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let key = services::publish_area_update(
//!         &repo,
//!         Area::A,
//!         AreaCounts::new(12, 38),
//!         &DisplayZone::Local,
//!     )
//!     .await?;
//!     println!("history record {}", key);
//!     Ok(())
//! }
//! ```

use log::info;
use serde_json::{json, Value};

use super::repository::{ErrorContext, FeedRepository, RepositoryError, RepositoryResult};
use crate::models::{format_iso, now_ms, Area, AreaCounts, DisplayZone};
use crate::services::history::snapshot_records;

// ==================== Health & Connection ====================

/// Check if the feed backend is reachable.
pub async fn health_check<R: FeedRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Live counts ====================

/// History record written for one live count update.
///
/// Carries the raw timestamp plus the `iso` and `time` display strings so
/// readers do not have to re-derive them.
pub fn history_record(area: Area, counts: AreaCounts, ts: i64, zone: &DisplayZone) -> Value {
    json!({
        "area": area.as_str(),
        "occupied": counts.occupied,
        "available": counts.available,
        "ts": ts,
        "iso": format_iso(ts),
        "time": zone.format_time(ts),
    })
}

/// Set the live counts of `area` and append the matching history record,
/// stamped with the current time.
///
/// # Returns
/// The push key of the history record.
pub async fn publish_area_update<R: FeedRepository + ?Sized>(
    repo: &R,
    area: Area,
    counts: AreaCounts,
    zone: &DisplayZone,
) -> RepositoryResult<String> {
    publish_area_update_at(repo, area, counts, now_ms(), zone).await
}

/// [`publish_area_update`] with an explicit timestamp.
pub async fn publish_area_update_at<R: FeedRepository + ?Sized>(
    repo: &R,
    area: Area,
    counts: AreaCounts,
    ts: i64,
    zone: &DisplayZone,
) -> RepositoryResult<String> {
    repo.set_area_counts(area, counts)
        .await
        .map_err(|e| e.with_operation("publish_area_update"))?;
    let key = repo
        .push_history(history_record(area, counts, ts, zone))
        .await
        .map_err(|e| e.with_operation("publish_area_update"))?;

    info!(
        "Area {} updated: occupied={}, available={} (history key {})",
        area, counts.occupied, counts.available, key
    );
    Ok(key)
}

// ==================== History ====================

/// Replace the whole history list with the records of `snapshot`.
///
/// Accepts the same shapes the feed delivers: an object keyed by push id,
/// an array, or null for an empty history. Individual records are not
/// validated here; the History Store drops unusable ones on read.
pub async fn import_history<R: FeedRepository + ?Sized>(
    repo: &R,
    snapshot: &Value,
) -> RepositoryResult<usize> {
    if !(snapshot.is_object() || snapshot.is_array() || snapshot.is_null()) {
        return Err(RepositoryError::validation_with_context(
            "History snapshot must be an object, an array or null",
            ErrorContext::new("import_history").with_entity("history"),
        ));
    }

    let records: Vec<Value> = snapshot_records(snapshot).into_iter().cloned().collect();
    let count = repo.replace_history(records).await?;
    info!("Imported history snapshot with {} records", count);
    Ok(count)
}

/// Complete history list as the feed holds it.
pub async fn history_snapshot<R: FeedRepository + ?Sized>(repo: &R) -> RepositoryResult<Value> {
    repo.history_snapshot().await
}

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;
