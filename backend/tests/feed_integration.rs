use std::sync::Arc;
use std::time::Duration;

use parking_dashboard::db::repositories::LocalRepository;
use parking_dashboard::db::repository::FeedRepository;
use parking_dashboard::db::services;
use parking_dashboard::models::{Area, AreaCounts, DisplayZone};
use parking_dashboard::routes::dashboard::EMPTY_HISTORY_LINE;
use parking_dashboard::services::dashboard::Dashboard;
use parking_dashboard::services::feed::{spawn_feed_sync, sync_once};
use serde_json::json;
use tokio::sync::watch;

async fn wait_until(updates: &mut watch::Receiver<u64>, mut done: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done() {
            updates.changed().await.unwrap();
        }
    })
    .await
    .expect("dashboard did not catch up");
}

#[tokio::test]
async fn test_published_updates_reach_the_dashboard() {
    let repo = LocalRepository::new();
    let dashboard = Dashboard::new(10).into_shared();
    let (sync, mut updates) = spawn_feed_sync(Arc::new(repo.clone()), Arc::clone(&dashboard));

    let zone = DisplayZone::utc();
    services::publish_area_update_at(&repo, Area::A, AreaCounts::new(12, 38), 60_000, &zone)
        .await
        .unwrap();
    services::publish_area_update_at(&repo, Area::C, AreaCounts::new(5, 45), 120_000, &zone)
        .await
        .unwrap();

    wait_until(&mut updates, || dashboard.read().store().len() == 2).await;

    let view = dashboard.read().view(&zone);
    assert_eq!(view.areas[0].occupied, 12);
    assert_eq!(view.areas[2].available, 45);
    assert_eq!(
        view.recent,
        vec![
            "[12:02:00 AM] Area C — Occupied: 5, Available: 45".to_string(),
            "[12:01:00 AM] Area A — Occupied: 12, Available: 38".to_string(),
        ]
    );

    sync.abort();
}

#[tokio::test]
async fn test_import_replaces_history_wholesale() {
    let repo = LocalRepository::new();
    let dashboard = Dashboard::default().into_shared();

    services::import_history(
        &repo,
        &json!([
            {"area": "A", "ts": 1},
            {"area": "B", "ts": 2},
            {"area": "C"},
        ]),
    )
    .await
    .unwrap();
    sync_once(&repo, &dashboard).await.unwrap();
    assert_eq!(dashboard.read().store().len(), 2);

    services::import_history(&repo, &json!(null)).await.unwrap();
    sync_once(&repo, &dashboard).await.unwrap();
    assert!(dashboard.read().store().is_empty());
    assert_eq!(
        dashboard.read().view(&DisplayZone::utc()).recent,
        vec![EMPTY_HISTORY_LINE.to_string()]
    );
}

#[tokio::test]
async fn test_recent_list_is_capped() {
    let repo = LocalRepository::new();
    for i in 0..25 {
        repo.push_history(json!({"area": "B", "occupied": i, "available": 0, "ts": 1000 + i}))
            .await
            .unwrap();
    }
    let dashboard = Dashboard::new(10).into_shared();
    sync_once(&repo, &dashboard).await.unwrap();

    let recent = dashboard.read().view(&DisplayZone::utc()).recent;
    assert_eq!(recent.len(), 10);
    assert!(recent[0].contains("Occupied: 24"));
    assert!(recent[9].contains("Occupied: 15"));
}

#[tokio::test]
async fn test_sync_survives_outage() {
    let repo = LocalRepository::new();
    let dashboard = Dashboard::default().into_shared();
    let (sync, mut updates) = spawn_feed_sync(Arc::new(repo.clone()), Arc::clone(&dashboard));
    wait_until(&mut updates, || dashboard.read().revision() >= 1).await;

    repo.set_healthy(false);
    assert!(repo.push_history(json!({"area": "A", "ts": 5})).await.is_err());

    repo.set_healthy(true);
    repo.push_history(json!({"area": "A", "ts": 6})).await.unwrap();
    wait_until(&mut updates, || dashboard.read().store().len() == 1).await;
    assert_eq!(dashboard.read().store().samples()[0].timestamp, 6);

    sync.abort();
}
