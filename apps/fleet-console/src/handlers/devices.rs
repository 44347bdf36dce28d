//! 设备（算力单元）与摄像头 handlers
//!
//! - GET /api/devices - 列出单元（来自同步快照）
//! - POST /api/devices - 注册单元（需先探活成功）
//! - PUT /api/devices/{id} - 单元改名
//! - DELETE /api/devices/{id} - 删除单元
//! - GET /api/devices/{id}/cameras - 单元上的摄像头（实时拉取）
//! - PUT /api/streamers/{uuid}/name - 摄像头改名
//! - POST /api/refresh - 手动触发一次同步
//!
//! 写操作成功后立即同步一次，保证列表页看到最新数据。

use crate::AppState;
use crate::utils::response::{
    backend_error, bad_request_error, camera_to_dto, not_found_error, storage_error,
    unit_to_dto, upstream_unavailable,
};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{
    ApiResponse, CameraDto, CreateUnitRequest, RefreshDto, RenameStreamerRequest,
    UpdateUnitRequest, UnitDto,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::ComputeUnit;
use fleet_backend::UnitUpdate;
use fleet_sync::SyncOutcome;
use std::collections::HashSet;
use tracing::info;

#[derive(serde::Deserialize)]
pub struct UnitPath {
    unit_id: String,
}

#[derive(serde::Deserialize)]
pub struct StreamerPath {
    streamer_uuid: String,
}

/// 列出单元
///
/// 快照尚未建立时（后台同步关闭或首次轮询未完成）先同步一次。
pub async fn list_devices(State(state): State<AppState>) -> Response {
    let snapshot = match state.sync.ensure_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(reason) => return upstream_unavailable(reason),
    };
    let data: Vec<UnitDto> = snapshot.units.iter().map(unit_to_dto).collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 注册单元
///
/// # 流程
///
/// 1. 校验 IP 必填、名称可选
/// 2. 探活单元 AI 服务，只有返回 `pong` 才继续
/// 3. 调用后端注册（后端负责 IP 唯一性，重复返回 409）
/// 4. 同步一次并返回新单元
pub async fn create_device(
    State(state): State<AppState>,
    Json(req): Json<CreateUnitRequest>,
) -> Response {
    let ip_address = match normalize_required(req.ip_address, "ip_address") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };

    let report = state.backend.ping_unit(&ip_address).await;
    if !report.reachable {
        return bad_request_error(format!(
            "Compute unit is not reachable: {}",
            report.response
        ));
    }

    match state.backend.add_unit(&ip_address, name.as_deref()).await {
        Ok(unit) => {
            info!(unit_id = %unit.id, ip = %unit.ip_address, "compute unit registered");
            state.sync.poll_once().await;
            (StatusCode::OK, Json(ApiResponse::success(unit_to_dto(&unit)))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

/// 单元改名
pub async fn update_device(
    State(state): State<AppState>,
    Path(path): Path<UnitPath>,
    Json(req): Json<UpdateUnitRequest>,
) -> Response {
    let name = match normalize_optional(req.name, "name") {
        Ok(Some(value)) => value,
        Ok(None) => return bad_request_error("name required"),
        Err(response) => return response,
    };
    match state
        .backend
        .update_unit(&path.unit_id, &UnitUpdate::rename(name))
        .await
    {
        Ok(unit) => {
            state.sync.poll_once().await;
            (StatusCode::OK, Json(ApiResponse::success(unit_to_dto(&unit)))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

/// 删除单元
///
/// 单元上的收藏保留，监控页会把它们标为 stale。
pub async fn delete_device(
    State(state): State<AppState>,
    Path(path): Path<UnitPath>,
) -> Response {
    match state.backend.delete_unit(&path.unit_id).await {
        Ok(()) => {
            info!(unit_id = %path.unit_id, "compute unit deleted");
            state.sync.poll_once().await;
            (StatusCode::OK, Json(ApiResponse::success(()))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

/// 手动刷新
pub async fn refresh(State(state): State<AppState>) -> Response {
    let outcome = state.sync.poll_once().await;
    let outcome = match outcome {
        SyncOutcome::Updated(_) => "updated",
        SyncOutcome::Unchanged => "unchanged",
        SyncOutcome::Failed(reason) => return upstream_unavailable(reason),
    };
    let data = RefreshDto {
        outcome: outcome.to_string(),
        revision: state.sync.snapshot().revision,
    };
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 单元上的摄像头，附带是否已收藏
pub async fn list_unit_cameras(
    State(state): State<AppState>,
    Path(path): Path<UnitPath>,
) -> Response {
    let unit = match resolve_unit(&state, &path.unit_id).await {
        Ok(unit) => unit,
        Err(response) => return response,
    };
    let cameras = match state.backend.list_cameras(&unit.ip_address).await {
        Ok(cameras) => cameras,
        Err(err) => return backend_error(err),
    };
    let favorites: HashSet<String> = match state.favorites.list().await {
        Ok(items) => items.into_iter().map(|item| item.streamer_uuid).collect(),
        Err(err) => return storage_error(err),
    };
    let data: Vec<CameraDto> = cameras
        .iter()
        .map(|camera| {
            camera_to_dto(
                camera,
                &unit.ip_address,
                favorites.contains(&camera.streamer_uuid),
            )
        })
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 摄像头改名；已收藏时同步更新收藏中的名称
pub async fn rename_streamer(
    State(state): State<AppState>,
    Path(path): Path<StreamerPath>,
    Json(req): Json<RenameStreamerRequest>,
) -> Response {
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Err(err) = state
        .backend
        .rename_streamer(&path.streamer_uuid, &name)
        .await
    {
        return backend_error(err);
    }
    match state.favorites.find(&path.streamer_uuid).await {
        Ok(Some(mut favorite)) => {
            favorite.streamer_hr_name = name.clone();
            if let Err(err) = state.favorites.update(favorite).await {
                return storage_error(err);
            }
        }
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "streamerUuid": path.streamer_uuid,
            "name": name,
        }))),
    )
        .into_response()
}

/// 先查快照，找不到再查后端（快照可能尚未包含新注册的单元）
async fn resolve_unit(state: &AppState, unit_id: &str) -> Result<ComputeUnit, Response> {
    if let Some(unit) = state.sync.snapshot().unit(unit_id) {
        return Ok(unit.clone());
    }
    match state.backend.list_units().await {
        Ok(units) => units
            .into_iter()
            .find(|unit| unit.id == unit_id)
            .ok_or_else(not_found_error),
        Err(err) => Err(backend_error(err)),
    }
}
