//! 稳定的 DTO 与 API 响应契约。
//!
//! 管控台对前端暴露的 JSON 一律使用 camelCase。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// 算力单元 / 摄像头
// ============================================================================

/// 新增算力单元请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitRequest {
    #[serde(alias = "ip_address")]
    pub ip_address: String,
    pub name: Option<String>,
}

/// 算力单元更新请求体（目前只支持改名）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    pub name: Option<String>,
}

/// Streamer 改名请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameStreamerRequest {
    pub name: String,
}

/// 摄像头返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraDto {
    pub streamer_uuid: String,
    pub name: String,
    pub streamer_type: String,
    pub config_template_name: String,
    pub is_alive: bool,
    pub compute_unit_ip: String,
    pub features: Vec<String>,
    pub is_favorite: bool,
}

/// 算力单元返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub status: String,
    pub last_seen: Option<String>,
    pub camera_count: usize,
    pub live_camera_count: usize,
}

/// 手动刷新结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshDto {
    pub outcome: String,
    pub revision: u64,
}

// ============================================================================
// 收藏 / 监控
// ============================================================================

/// 收藏请求体：从当前快照中按 uuid 查找摄像头。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    #[serde(alias = "streamer_uuid")]
    pub streamer_uuid: String,
}

/// 收藏返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDto {
    pub streamer_uuid: String,
    pub name: String,
    pub streamer_type: String,
    pub config_template_name: String,
    #[serde(rename = "computeUnitIP")]
    pub compute_unit_ip: String,
    pub is_alive: bool,
    pub features: Vec<String>,
    pub added_at_ms: i64,
}

/// 监控页条目：收藏 + 实时状态。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorItemDto {
    pub favorite: FavoriteDto,
    pub live: bool,
    pub unit_online: bool,
    /// 当前快照中找不到该摄像头。
    pub stale: bool,
}

// ============================================================================
// 总览
// ============================================================================

/// 总览页统计。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub units_total: usize,
    pub units_online: usize,
    pub units_offline: usize,
    pub cameras_total: usize,
    pub cameras_live: usize,
    pub favorites: usize,
    pub revision: u64,
    pub updated_at_ms: Option<i64>,
    /// 后端主机状态；获取失败时为 null。
    pub system: Option<SystemStatsDto>,
    pub ai_service_healthy: bool,
}

/// 后端主机资源状态。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatsDto {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub memory_total: u64,
    pub memory_used: u64,
    pub disk_usage: f64,
    pub disk_total: u64,
    pub disk_used: u64,
    pub disk_free: u64,
    pub temperature: f64,
    pub uptime: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// 应用 / 日志 / 记忆集
// ============================================================================

/// 以单元 IP 定位 AI 服务的查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitQuery {
    #[serde(alias = "compute_unit_ip")]
    pub unit_ip: Option<String>,
}

/// 应用分配查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentQuery {
    #[serde(alias = "compute_unit_ip")]
    pub unit_ip: Option<String>,
    #[serde(alias = "streamer_uuid")]
    pub streamer_uuid: Option<String>,
}

/// 视频流配置查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamerConfigQuery {
    #[serde(alias = "streamer_uuid")]
    pub streamer_uuid: Option<String>,
}

/// 新增/更新应用分配请求体。
///
/// `extra` 为列表接口返回的后端附加字段，更新时原样带回。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    #[serde(default, alias = "assignment_uuid")]
    pub assignment_uuid: Option<String>,
    #[serde(alias = "streamer_uuid")]
    pub streamer_uuid: String,
    #[serde(alias = "app_name")]
    pub app_name: String,
    #[serde(alias = "result_name")]
    pub result_name: String,
    #[serde(default, alias = "is_active")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// 应用分配返回结构。`extra` 保留后端未识别的字段（键名不做转换）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub assignment_uuid: Option<String>,
    pub streamer_uuid: String,
    pub app_name: String,
    pub result_name: String,
    /// `app_name.result_name`
    pub feature: String,
    pub is_active: bool,
    pub extra: Map<String, Value>,
}

/// 异常日志返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyLogDto {
    pub anomaly_uuid: String,
    pub streamer_uuid: Option<String>,
    pub file_path: Option<String>,
    pub is_starred: bool,
    pub created_at: Option<String>,
    pub extra: Map<String, Value>,
}

/// 记忆集返回结构。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySetDto {
    pub set_uuid: String,
    pub streamer_uuid: Option<String>,
    pub sample_count: Option<u64>,
    pub created_at: Option<String>,
    pub extra: Map<String, Value>,
}

/// 异常图片查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogImageQuery {
    #[serde(alias = "compute_unit_ip")]
    pub unit_ip: Option<String>,
    #[serde(alias = "file_path")]
    pub file_path: Option<String>,
}

/// 异常日志加星请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarLogRequest {
    #[serde(alias = "compute_unit_ip")]
    pub unit_ip: String,
    #[serde(alias = "is_starred")]
    pub is_starred: bool,
}

/// 缩略图请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailsRequest {
    #[serde(alias = "compute_unit_ip")]
    pub unit_ip: String,
    #[serde(alias = "sample_uuids")]
    pub sample_uuids: Vec<String>,
}

/// 记忆集样本返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySetSamplesDto {
    pub set_uuid: String,
    pub sample_uuids: Vec<String>,
}

/// 透传类返回：后端 JSON 原样放入 data。
pub type PassthroughDto = Value;

/// 同步指标快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub polls: u64,
    pub poll_failures: u64,
    pub snapshot_updates: u64,
    pub unchanged_polls: u64,
    pub ping_failures: u64,
    pub camera_fetch_failures: u64,
    pub status_pushes: u64,
    pub favorites_reconciled: u64,
}
