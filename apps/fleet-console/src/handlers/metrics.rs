//! 同步指标快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fleet_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            polls: snapshot.polls,
            poll_failures: snapshot.poll_failures,
            snapshot_updates: snapshot.snapshot_updates,
            unchanged_polls: snapshot.unchanged_polls,
            ping_failures: snapshot.ping_failures,
            camera_fetch_failures: snapshot.camera_fetch_failures,
            status_pushes: snapshot.status_pushes,
            favorites_reconciled: snapshot.favorites_reconciled,
        })),
    )
        .into_response()
}
