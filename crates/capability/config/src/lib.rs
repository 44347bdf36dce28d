//! 应用运行配置加载。

use std::env;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 外部管理后端（REST API）根地址。
    pub backend_url: String,
    pub backend_token: Option<String>,
    /// 同时配置用户名与口令时，启动时登录后端换取 token。
    pub backend_username: Option<String>,
    pub backend_password: Option<String>,
    pub favorites_path: String,
    pub poll_interval_seconds: u64,
    pub request_timeout_seconds: u64,
    pub ping_timeout_seconds: u64,
    pub unit_port: u16,
    pub sync_enabled: bool,
    pub reconcile_status: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = env::var("FLEET_BACKEND_URL")
            .map_err(|_| ConfigError::Missing("FLEET_BACKEND_URL".to_string()))?;
        let backend_url = normalize_url("FLEET_BACKEND_URL", backend_url)?;
        let http_addr =
            env::var("FLEET_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let backend_token = read_optional("FLEET_BACKEND_TOKEN");
        let backend_username = read_optional("FLEET_BACKEND_USERNAME");
        let backend_password = read_optional("FLEET_BACKEND_PASSWORD");
        let favorites_path =
            env::var("FLEET_FAVORITES_PATH").unwrap_or_else(|_| "favorites.json".to_string());
        let poll_interval_seconds = read_positive_u64("FLEET_POLL_INTERVAL_SECONDS", 10)?;
        let request_timeout_seconds = read_positive_u64("FLEET_REQUEST_TIMEOUT_SECONDS", 10)?;
        let ping_timeout_seconds = read_positive_u64("FLEET_PING_TIMEOUT_SECONDS", 5)?;
        let unit_port = read_u16_with_default("FLEET_UNIT_PORT", 8000)?;
        let sync_enabled = read_bool_with_default("FLEET_SYNC", true);
        let reconcile_status = read_bool_with_default("FLEET_RECONCILE_STATUS", true);

        Ok(Self {
            http_addr,
            backend_url,
            backend_token,
            backend_username,
            backend_password,
            favorites_path,
            poll_interval_seconds,
            request_timeout_seconds,
            ping_timeout_seconds,
            unit_port,
            sync_enabled,
            reconcile_status,
        })
    }

    /// 返回登录凭据（用户名与口令都存在时）。
    pub fn backend_credentials(&self) -> Option<(&str, &str)> {
        match (&self.backend_username, &self.backend_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_seconds)
    }
}

/// 后端地址必须是 http(s)，去掉末尾的 `/`。
fn normalize_url(key: &str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid(key.to_string(), value));
    }
    Ok(trimmed.to_string())
}

/// 读取正整数环境变量，0 视为非法。
fn read_positive_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
