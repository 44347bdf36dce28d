//! 应用分配 handlers
//!
//! - GET /api/apps/supported?unitIp= - 单元支持的应用（透传）
//! - GET /api/apps/configs?streamerUuid= - 视频流在 AI 服务上的配置（透传）
//! - GET /api/apps/assignments?unitIp=&streamerUuid= - 应用分配列表
//! - PUT /api/apps/assignments?unitIp= - 新增/更新分配
//! - DELETE /api/apps/assignments/{uuid}?unitIp= - 删除分配

use crate::AppState;
use crate::utils::response::{assignment_to_dto, backend_error, bad_request_error};
use crate::utils::{normalize_optional, normalize_required, require_unit_ip};
use api_contract::{
    ApiResponse, AssignmentDto, AssignmentQuery, PassthroughDto, StreamerConfigQuery, UnitQuery,
    UpdateAssignmentRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{AppAssignment, FeatureRef};

#[derive(serde::Deserialize)]
pub struct AssignmentPath {
    assignment_uuid: String,
}

pub async fn list_supported_apps(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.backend.supported_apps(&unit_ip).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::<PassthroughDto>::success(data)),
        )
            .into_response(),
        Err(err) => backend_error(err),
    }
}

pub async fn get_streamer_configs(
    State(state): State<AppState>,
    Query(query): Query<StreamerConfigQuery>,
) -> Response {
    let streamer_uuid =
        match normalize_required(query.streamer_uuid.unwrap_or_default(), "streamerUuid") {
            Ok(value) => value,
            Err(response) => return response,
        };
    match state.backend.streamer_configs(&streamer_uuid).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::<PassthroughDto>::success(data)),
        )
            .into_response(),
        Err(err) => backend_error(err),
    }
}

pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let streamer_uuid = match normalize_optional(query.streamer_uuid, "streamerUuid") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .backend
        .list_assignments(&unit_ip, streamer_uuid.as_deref())
        .await
    {
        Ok(items) => {
            let data: Vec<AssignmentDto> = items.into_iter().map(assignment_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

/// 新增/更新分配
///
/// 应用名不能为空且不含 `.`，结果名不能为空，二者组成 feature `app.result`。
pub async fn update_assignment(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let streamer_uuid = match normalize_required(req.streamer_uuid, "streamerUuid") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let feature = match FeatureRef::from_parts(&req.app_name, &req.result_name) {
        Ok(feature) => feature,
        Err(err) => return bad_request_error(err.to_string()),
    };
    let assignment = AppAssignment {
        assignment_uuid: req.assignment_uuid,
        streamer_uuid,
        app_name: feature.app_name,
        result_name: feature.result_name,
        is_active: req.is_active.unwrap_or(true),
        extra: req.extra,
    };
    match state.backend.update_assignment(&unit_ip, &assignment).await {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::<PassthroughDto>::success(data)),
        )
            .into_response(),
        Err(err) => backend_error(err),
    }
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(path): Path<AssignmentPath>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .backend
        .delete_assignment(&unit_ip, &path.assignment_uuid)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => backend_error(err),
    }
}
