//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers：
//! - 健康检查与指标：/health, /metrics
//! - 总览：/api/dashboard
//! - 设备（算力单元）与摄像头：/api/devices/*, /api/streamers/*, /api/refresh
//! - 收藏与监控：/api/favorites/*, /api/monitor/*
//! - 应用分配：/api/apps/*
//! - 异常日志：/api/logs/*
//! - 学习产品（记忆集）：/api/products/*

use super::AppState;
use super::handlers::*;
use crate::middleware::request_context;
use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};

/// 创建完整路由（含请求追踪中间件与 CORS）
pub fn create_router(state: AppState) -> Router {
    create_api_router()
        .with_state(state)
        .layer(middleware::from_fn(request_context))
        .layer(cors_layer())
}

/// 前端跨域访问：任意来源，常用方法与头
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/devices", get(list_devices).post(create_device))
        .route(
            "/api/devices/:unit_id",
            put(update_device).delete(delete_device),
        )
        .route("/api/devices/:unit_id/cameras", get(list_unit_cameras))
        .route("/api/refresh", post(refresh))
        .route("/api/streamers/:streamer_uuid/name", put(rename_streamer))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route("/api/favorites/:streamer_uuid", delete(remove_favorite))
        .route("/api/monitor", get(get_monitor))
        .route("/api/monitor/:streamer_uuid/frame", get(get_last_frame))
        .route("/api/apps/supported", get(list_supported_apps))
        .route("/api/apps/configs", get(get_streamer_configs))
        .route(
            "/api/apps/assignments",
            get(list_assignments).put(update_assignment),
        )
        .route(
            "/api/apps/assignments/:assignment_uuid",
            delete(delete_assignment),
        )
        .route("/api/logs", get(list_logs))
        .route("/api/logs/image", get(get_log_image))
        .route("/api/logs/:anomaly_uuid/star", post(star_log))
        .route("/api/logs/:anomaly_uuid", delete(delete_log))
        .route("/api/products", get(list_products))
        .route("/api/products/thumbnails", post(get_thumbnails))
        .route("/api/products/:set_uuid/samples", get(list_samples))
        .route("/api/products/:set_uuid", delete(delete_product))
}
