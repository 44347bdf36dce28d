//! 收藏 handlers
//!
//! - GET /api/favorites - 列出收藏（最新在前）
//! - POST /api/favorites - 收藏当前快照中的摄像头
//! - DELETE /api/favorites/{uuid} - 取消收藏

use crate::AppState;
use crate::utils::normalize_required;
use crate::utils::response::{
    favorite_to_dto, not_found_error, storage_error, upstream_unavailable,
};
use api_contract::{AddFavoriteRequest, ApiResponse, FavoriteDto};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{FavoriteStreamer, now_epoch_ms};
use tracing::info;

#[derive(serde::Deserialize)]
pub struct FavoritePath {
    streamer_uuid: String,
}

pub async fn list_favorites(State(state): State<AppState>) -> Response {
    match state.favorites.list().await {
        Ok(items) => {
            let data: Vec<FavoriteDto> = items.into_iter().map(favorite_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 收藏摄像头
///
/// 摄像头必须出现在当前快照中（快照未建立时先同步一次）；重复收藏返回 409。
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(req): Json<AddFavoriteRequest>,
) -> Response {
    let streamer_uuid = match normalize_required(req.streamer_uuid, "streamer_uuid") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let snapshot = match state.sync.ensure_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(reason) => return upstream_unavailable(reason),
    };
    let Some((unit, camera)) = snapshot.find_camera(&streamer_uuid) else {
        return not_found_error();
    };
    let favorite = FavoriteStreamer::from_camera(camera, &unit.ip_address, now_epoch_ms());
    match state.favorites.add(favorite).await {
        Ok(favorite) => {
            info!(streamer_uuid = %favorite.streamer_uuid, "favorite added");
            (
                StatusCode::OK,
                Json(ApiResponse::success(favorite_to_dto(favorite))),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(path): Path<FavoritePath>,
) -> Response {
    match state.favorites.remove(&path.streamer_uuid).await {
        Ok(true) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Ok(false) => not_found_error(),
        Err(err) => storage_error(err),
    }
}
