//! 总览页
//!
//! - GET /api/dashboard - 单元/摄像头统计、收藏数、快照版本、后端主机状态与 AI 服务健康

use crate::AppState;
use crate::utils::response::{storage_error, system_stats_to_dto};
use api_contract::{ApiResponse, DashboardDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// 总览
///
/// 快照未建立时先同步一次。主机状态与 AI 健康并发获取，失败只影响对应字段。
pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    let favorites = match state.favorites.list().await {
        Ok(items) => items.len(),
        Err(err) => return storage_error(err),
    };
    if let Err(reason) = state.sync.ensure_snapshot().await {
        warn!(%reason, "initial sync failed, dashboard shows empty fleet");
    }
    let (system, ai_health) = tokio::join!(
        state.backend.system_stats(),
        state.backend.ai_service_health()
    );
    let system = match system {
        Ok(stats) => Some(system_stats_to_dto(stats)),
        Err(err) => {
            warn!(error = %err, "system stats unavailable");
            None
        }
    };
    let snapshot = state.sync.snapshot();
    let counts = snapshot.counts();
    let data = DashboardDto {
        units_total: counts.units_total,
        units_online: counts.units_online,
        units_offline: counts.units_offline,
        cameras_total: counts.cameras_total,
        cameras_live: counts.cameras_live,
        favorites,
        revision: snapshot.revision,
        updated_at_ms: snapshot.updated_at_ms,
        system,
        ai_service_healthy: ai_health.is_ok(),
    };
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}
