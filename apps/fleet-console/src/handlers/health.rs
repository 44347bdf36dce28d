use crate::AppState;
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// 健康检查：返回进程存活与当前快照版本。
pub async fn health(State(state): State<AppState>) -> Response {
    let snapshot = state.sync.snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "ok": true,
            "revision": snapshot.revision,
        }))),
    )
        .into_response()
}
