//! 监控页 handlers
//!
//! - GET /api/monitor - 收藏 + 实时状态
//! - GET /api/monitor/{uuid}/frame - 最后一帧（透传后端）

use crate::AppState;
use crate::utils::normalize_optional;
use crate::utils::response::{
    backend_error, monitor_item_to_dto, not_found_error, storage_error, sync_error,
};
use api_contract::{ApiResponse, MonitorItemDto, PassthroughDto, UnitQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

#[derive(serde::Deserialize)]
pub struct FramePath {
    streamer_uuid: String,
}

/// 收藏叠加实时状态
///
/// 快照未建立时先同步一次；同步失败仍返回收藏，全部按 stale 展示。
pub async fn get_monitor(State(state): State<AppState>) -> Response {
    if let Err(reason) = state.sync.ensure_snapshot().await {
        warn!(%reason, "initial sync failed, monitor shows stored favorites only");
    }
    match state.sync.monitor().await {
        Ok(items) => {
            let data: Vec<MonitorItemDto> = items.into_iter().map(monitor_item_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => sync_error(err),
    }
}

/// 最后一帧
///
/// 单元 IP 依次取自查询参数、收藏记录、当前快照。
pub async fn get_last_frame(
    State(state): State<AppState>,
    Path(path): Path<FramePath>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match normalize_optional(query.unit_ip, "unitIp") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let unit_ip = match unit_ip {
        Some(ip) => ip,
        None => match state.favorites.find(&path.streamer_uuid).await {
            Ok(Some(favorite)) => favorite.compute_unit_ip,
            Ok(None) => {
                let snapshot = state.sync.snapshot();
                match snapshot.find_camera(&path.streamer_uuid) {
                    Some((unit, _)) => unit.ip_address.clone(),
                    None => return not_found_error(),
                }
            }
            Err(err) => return storage_error(err),
        },
    };
    match state.backend.last_frame(&path.streamer_uuid, &unit_ip).await {
        Ok(frame) => (
            StatusCode::OK,
            Json(ApiResponse::<PassthroughDto>::success(frame)),
        )
            .into_response(),
        Err(err) => backend_error(err),
    }
}
