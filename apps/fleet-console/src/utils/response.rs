//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：bad_request_error, not_found_error, conflict_error, storage_error, backend_error, sync_error
//! - DTO 转换：unit_to_dto, camera_to_dto, favorite_to_dto, monitor_item_to_dto,
//!   assignment_to_dto, anomaly_log_to_dto, memory_set_to_dto, system_stats_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应
//! - 后端的 400/404/409 原样映射，其余后端失败归为 UPSTREAM.*

use api_contract::{
    AnomalyLogDto, ApiResponse, AssignmentDto, CameraDto, FavoriteDto, MemorySetDto,
    MonitorItemDto, SystemStatsDto, UnitDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{
    AnomalyLog, AppAssignment, Camera, ComputeUnit, FavoriteStreamer, MemorySet, SystemStats,
};
use fleet_backend::BackendError;
use fleet_storage::StorageError;
use fleet_sync::{MonitorItem, SyncError};
use tracing::warn;

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(code, message.into()))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "INVALID.REQUEST", message)
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    error_response(StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND", "not found")
}

/// 资源冲突错误响应
pub fn conflict_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::CONFLICT, "RESOURCE.CONFLICT", message)
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    match err {
        StorageError::Conflict(uuid) => conflict_error(format!("already a favorite: {uuid}")),
        err => {
            warn!(error = %err, "favorite storage failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL.ERROR",
                err.to_string(),
            )
        }
    }
}

/// 后端错误响应
pub fn backend_error(err: BackendError) -> Response {
    match err {
        BackendError::InvalidInput(message) => bad_request_error(message),
        BackendError::Status { status: 400, message } => bad_request_error(message),
        BackendError::Status { status: 404, message } => {
            error_response(StatusCode::NOT_FOUND, "RESOURCE.NOT_FOUND", message)
        }
        BackendError::Status { status: 409, message } => conflict_error(message),
        BackendError::Status { status, message } => {
            warn!(status, %message, "backend rejected request");
            error_response(StatusCode::BAD_GATEWAY, "UPSTREAM.ERROR", message)
        }
        BackendError::Timeout => error_response(
            StatusCode::GATEWAY_TIMEOUT,
            "UPSTREAM.TIMEOUT",
            "backend request timed out",
        ),
        BackendError::Transport(message) => {
            warn!(%message, "backend unreachable");
            error_response(StatusCode::BAD_GATEWAY, "UPSTREAM.UNREACHABLE", message)
        }
        BackendError::Decode(message) => error_response(
            StatusCode::BAD_GATEWAY,
            "UPSTREAM.INVALID_RESPONSE",
            message,
        ),
    }
}

/// 同步错误响应
pub fn sync_error(err: SyncError) -> Response {
    match err {
        SyncError::Backend(err) => backend_error(err),
        SyncError::Storage(err) => storage_error(err),
    }
}

/// 后端整体不可用（轮询失败）响应
pub fn upstream_unavailable(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_GATEWAY, "UPSTREAM.UNREACHABLE", message)
}

/// ComputeUnit 转 UnitDto
pub fn unit_to_dto(unit: &ComputeUnit) -> UnitDto {
    UnitDto {
        id: unit.id.clone(),
        name: unit.name.clone(),
        ip_address: unit.ip_address.clone(),
        status: unit.status.as_str().to_string(),
        last_seen: unit.last_seen.clone(),
        camera_count: unit.cameras.len(),
        live_camera_count: unit.cameras.iter().filter(|camera| camera.is_alive).count(),
    }
}

/// Camera 转 CameraDto
pub fn camera_to_dto(camera: &Camera, unit_ip: &str, is_favorite: bool) -> CameraDto {
    CameraDto {
        streamer_uuid: camera.streamer_uuid.clone(),
        name: camera.streamer_hr_name.clone(),
        streamer_type: camera.streamer_type.clone(),
        config_template_name: camera.config_template_name.clone(),
        is_alive: camera.is_alive,
        compute_unit_ip: camera
            .compute_unit_ip
            .clone()
            .unwrap_or_else(|| unit_ip.to_string()),
        features: camera.features.clone(),
        is_favorite,
    }
}

/// FavoriteStreamer 转 FavoriteDto
pub fn favorite_to_dto(favorite: FavoriteStreamer) -> FavoriteDto {
    FavoriteDto {
        streamer_uuid: favorite.streamer_uuid,
        name: favorite.streamer_hr_name,
        streamer_type: favorite.streamer_type,
        config_template_name: favorite.config_template_name,
        compute_unit_ip: favorite.compute_unit_ip,
        is_alive: favorite.is_alive,
        features: favorite.features,
        added_at_ms: favorite.added_at_ms,
    }
}

/// MonitorItem 转 MonitorItemDto
pub fn monitor_item_to_dto(item: MonitorItem) -> MonitorItemDto {
    MonitorItemDto {
        favorite: favorite_to_dto(item.favorite),
        live: item.live,
        unit_online: item.unit_online,
        stale: item.stale,
    }
}

pub fn assignment_to_dto(assignment: AppAssignment) -> AssignmentDto {
    AssignmentDto {
        feature: assignment.feature().to_string(),
        assignment_uuid: assignment.assignment_uuid,
        streamer_uuid: assignment.streamer_uuid,
        app_name: assignment.app_name,
        result_name: assignment.result_name,
        is_active: assignment.is_active,
        extra: assignment.extra,
    }
}

pub fn anomaly_log_to_dto(log: AnomalyLog) -> AnomalyLogDto {
    AnomalyLogDto {
        anomaly_uuid: log.anomaly_uuid,
        streamer_uuid: log.streamer_uuid,
        file_path: log.file_path,
        is_starred: log.is_starred,
        created_at: log.created_at,
        extra: log.extra,
    }
}

pub fn memory_set_to_dto(set: MemorySet) -> MemorySetDto {
    MemorySetDto {
        set_uuid: set.set_uuid,
        streamer_uuid: set.streamer_uuid,
        sample_count: set.sample_count,
        created_at: set.created_at,
        extra: set.extra,
    }
}

pub fn system_stats_to_dto(stats: SystemStats) -> SystemStatsDto {
    SystemStatsDto {
        cpu_usage: stats.cpu_usage,
        memory_usage: stats.memory_usage,
        memory_total: stats.memory_total,
        memory_used: stats.memory_used,
        disk_usage: stats.disk_usage,
        disk_total: stats.disk_total,
        disk_used: stats.disk_used,
        disk_free: stats.disk_free,
        temperature: stats.temperature,
        uptime: stats.uptime,
        uptime_seconds: stats.uptime_seconds,
    }
}
