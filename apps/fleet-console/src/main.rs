//! 边缘算力单元管控台 HTTP 服务。
//!
//! 外部管理后端是数据权威；本服务负责状态同步、本地收藏与各页面的 JSON 视图。

mod handlers;
mod middleware;
mod routes;
#[cfg(test)]
mod test_support;
mod utils;

use fleet_backend::{FleetBackend, HttpBackendOptions, HttpFleetBackend};
use fleet_config::AppConfig;
use fleet_storage::{FavoriteStore, FileFavoriteStore};
use fleet_sync::{SyncConfig, Synchronizer};
use fleet_telemetry::init_tracing;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn FleetBackend>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub sync: Arc<Synchronizer>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let backend = Arc::new(HttpFleetBackend::new(HttpBackendOptions {
        base_url: config.backend_url.clone(),
        request_timeout: config.request_timeout(),
        ping_timeout: config.ping_timeout(),
        unit_port: config.unit_port,
        token: config.backend_token.clone(),
        credentials: config
            .backend_credentials()
            .map(|(username, password)| (username.to_string(), password.to_string())),
    })?);
    startup_login(&backend, &config).await;

    let favorites: Arc<dyn FavoriteStore> =
        Arc::new(FileFavoriteStore::open(&config.favorites_path).await?);
    let sync = Arc::new(Synchronizer::new(
        backend.clone(),
        favorites.clone(),
        SyncConfig {
            poll_interval: config.poll_interval(),
            reconcile_remote_status: config.reconcile_status,
        },
    ));
    if config.sync_enabled {
        sync.clone().spawn();
    } else {
        info!("background sync disabled, snapshot refreshes on demand");
    }

    let state = AppState {
        backend,
        favorites,
        sync,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        addr = %config.http_addr,
        backend = %config.backend_url,
        favorites = %config.favorites_path,
        "fleet console listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// 未配置 token 但配置了账号时先登录换取 token。
///
/// 后端不可用或拒绝登录时只告警，控制台照常启动；之后的请求遇到 401 会再次登录。
async fn startup_login(backend: &HttpFleetBackend, config: &AppConfig) -> bool {
    if config.backend_token.is_some() || config.backend_credentials().is_none() {
        return false;
    }
    match backend.login_with_credentials().await {
        Ok(_) => true,
        Err(err) => {
            warn!(
                backend = %config.backend_url,
                error = %err,
                "backend login failed at startup, continuing without token"
            );
            false
        }
    }
}
