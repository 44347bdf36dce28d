//! 异常日志 handlers
//!
//! - GET /api/logs?unitIp= - 异常日志列表
//! - GET /api/logs/image?unitIp=&filePath= - 异常图片（原始字节）
//! - POST /api/logs/{uuid}/star - 加星/取消加星
//! - DELETE /api/logs/{uuid}?unitIp= - 删除日志

use crate::AppState;
use crate::utils::response::{anomaly_log_to_dto, backend_error};
use crate::utils::{normalize_required, require_unit_ip};
use api_contract::{AnomalyLogDto, ApiResponse, LogImageQuery, StarLogRequest, UnitQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct AnomalyPath {
    anomaly_uuid: String,
}

pub async fn list_logs(State(state): State<AppState>, Query(query): Query<UnitQuery>) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.backend.anomaly_logs(&unit_ip).await {
        Ok(items) => {
            let data: Vec<AnomalyLogDto> = items.into_iter().map(anomaly_log_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

/// 图片按后端返回的 content-type 原样输出，不包装 ApiResponse。
pub async fn get_log_image(
    State(state): State<AppState>,
    Query(query): Query<LogImageQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let file_path = match normalize_required(query.file_path.unwrap_or_default(), "filePath") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.backend.anomaly_image(&unit_ip, &file_path).await {
        Ok(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, image.content_type)],
            image.bytes,
        )
            .into_response(),
        Err(err) => backend_error(err),
    }
}

pub async fn star_log(
    State(state): State<AppState>,
    Path(path): Path<AnomalyPath>,
    Json(payload): Json<StarLogRequest>,
) -> Response {
    let unit_ip = match require_unit_ip(Some(payload.unit_ip)) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .backend
        .star_anomaly(&unit_ip, &path.anomaly_uuid, payload.is_starred)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => backend_error(err),
    }
}

pub async fn delete_log(
    State(state): State<AppState>,
    Path(path): Path<AnomalyPath>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .backend
        .delete_anomaly(&unit_ip, &path.anomaly_uuid)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => backend_error(err),
    }
}
