//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Reads go to the session dashboard;
//! writes go to the feed repository and reach the dashboard through the
//! feed sync task.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::sse::{Event, KeepAlive, Sse},
    response::Response,
    Json,
};
use futures::stream::Stream;
use serde_json::Value;
use std::convert::Infallible;
use std::time::Duration;

use log::warn;

use super::download::ResponseSink;
use super::dto::{
    AnalyticsData, AreaCounts, DashboardData, HealthResponse, ImportResponse, PublishResponse,
    RangeQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{now_ms, Area};
use crate::services::{analytics, charts, export};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_area(segment: &str) -> Result<Area, AppError> {
    segment.parse::<Area>().map_err(AppError::BadRequest)
}

fn current_feed_revision(state: &AppState) -> u64 {
    *state.repository.subscribe().borrow()
}

/// Turn an export into a file download through `download_blob`.
fn attachment(file: export::ExportFile) -> Result<Response, AppError> {
    let mut sink = ResponseSink::new();
    export::download_blob(&mut sink, &file)?;
    sink.into_response().ok_or_else(|| {
        AppError::Internal(format!("Download of {} was not triggered", file.filename))
    })
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the feed is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let feed_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        feed: feed_status,
    }))
}

// =============================================================================
// Live dashboard
// =============================================================================

/// GET /v1/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> HandlerResult<DashboardData> {
    Ok(Json(state.dashboard.read().view(&state.zone)))
}

/// GET /v1/dashboard/stream
///
/// Server-Sent Events: one `dashboard` event with the full view right away
/// and one after every dashboard revision.
pub async fn stream_dashboard(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut updates = state.updates.clone();
    let stream = async_stream::stream! {
        loop {
            let revision = *updates.borrow_and_update();
            let view = state.dashboard.read().view(&state.zone);
            match Event::default()
                .event("dashboard")
                .id(revision.to_string())
                .json_data(&view)
            {
                Ok(event) => yield Ok(event),
                Err(e) => warn!("Skipping dashboard event for revision {}: {}", revision, e),
            }

            if updates.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

// =============================================================================
// Feed writes
// =============================================================================

/// PUT /v1/parking/{area}
///
/// Publish new live counts for one area. The dashboard picks the change up
/// asynchronously.
pub async fn publish_area_counts(
    State(state): State<AppState>,
    Path(area): Path<String>,
    Json(counts): Json<AreaCounts>,
) -> Result<(StatusCode, Json<PublishResponse>), AppError> {
    let area = parse_area(&area)?;
    let history_key =
        db_services::publish_area_update(state.repository.as_ref(), area, counts, &state.zone)
            .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PublishResponse {
            area,
            history_key,
            revision: current_feed_revision(&state),
        }),
    ))
}

/// PUT /v1/history
///
/// Replace the whole history list with the posted snapshot.
pub async fn import_history(
    State(state): State<AppState>,
    Json(snapshot): Json<Value>,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    let records = db_services::import_history(state.repository.as_ref(), &snapshot).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ImportResponse {
            records,
            revision: current_feed_revision(&state),
        }),
    ))
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /v1/analytics?range=
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> HandlerResult<AnalyticsData> {
    let range = query.resolve(state.default_range);
    let dashboard = state.dashboard.read();
    Ok(Json(analytics::analytics(
        dashboard.store(),
        range,
        now_ms(),
        &state.zone,
    )))
}

// =============================================================================
// Exports
// =============================================================================

/// GET /v1/export/history.csv
pub async fn export_history_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let file = export::history_csv(state.dashboard.read().store(), &state.zone);
    attachment(file)
}

/// GET /v1/export/analytics.csv?range=
pub async fn export_analytics_csv(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, AppError> {
    let range = query.resolve(state.default_range);
    let file = export::analytics_csv(state.dashboard.read().store(), range, now_ms(), &state.zone);
    attachment(file)
}

/// GET /v1/export/charts/{area}?range=
///
/// Chart rendering runs on the blocking pool.
pub async fn export_chart(
    State(state): State<AppState>,
    Path(area): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, AppError> {
    let area = parse_area(&area)?;
    let range = query.resolve(state.default_range);

    let series = {
        let dashboard = state.dashboard.read();
        let partitions = analytics::windowed(dashboard.store(), range, now_ms());
        let samples = partitions.get(&area).map(Vec::as_slice).unwrap_or_default();
        analytics::chart_series(samples, range, &state.zone)
    };

    let renderer = state.renderer.clone();
    let file =
        tokio::task::spawn_blocking(move || charts::chart_export(renderer.as_ref(), area, &series))
            .await??;
    attachment(file)
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
