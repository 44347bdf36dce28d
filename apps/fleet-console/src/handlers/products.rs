//! 产品（记忆集）handlers
//!
//! - GET /api/products?unitIp= - 记忆集列表
//! - GET /api/products/{set_uuid}/samples?unitIp= - 样本 UUID（去重保序）
//! - POST /api/products/thumbnails - 批量缩略图（透传）
//! - DELETE /api/products/{set_uuid}?unitIp= - 删除记忆集

use crate::AppState;
use crate::utils::response::{backend_error, bad_request_error, memory_set_to_dto};
use crate::utils::require_unit_ip;
use api_contract::{
    ApiResponse, MemorySetDto, MemorySetSamplesDto, PassthroughDto, ThumbnailsRequest, UnitQuery,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct SetPath {
    set_uuid: String,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.backend.memory_sets(&unit_ip).await {
        Ok(items) => {
            let data: Vec<MemorySetDto> = items.into_iter().map(memory_set_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

pub async fn list_samples(
    State(state): State<AppState>,
    Path(path): Path<SetPath>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .backend
        .memory_set_samples(&unit_ip, &path.set_uuid)
        .await
    {
        Ok(sample_uuids) => {
            let dto = MemorySetSamplesDto {
                set_uuid: path.set_uuid,
                sample_uuids,
            };
            (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
        }
        Err(err) => backend_error(err),
    }
}

pub async fn get_thumbnails(
    State(state): State<AppState>,
    Json(payload): Json<ThumbnailsRequest>,
) -> Response {
    let unit_ip = match require_unit_ip(Some(payload.unit_ip)) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let sample_uuids: Vec<String> = payload
        .sample_uuids
        .into_iter()
        .map(|uuid| uuid.trim().to_string())
        .filter(|uuid| !uuid.is_empty())
        .collect();
    if sample_uuids.is_empty() {
        return bad_request_error("sampleUuids required");
    }
    match state
        .backend
        .memory_set_thumbnails(&unit_ip, &sample_uuids)
        .await
    {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::<PassthroughDto>::success(data)),
        )
            .into_response(),
        Err(err) => backend_error(err),
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(path): Path<SetPath>,
    Query(query): Query<UnitQuery>,
) -> Response {
    let unit_ip = match require_unit_ip(query.unit_ip) {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .backend
        .delete_memory_set(&unit_ip, &path.set_uuid)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => backend_error(err),
    }
}
