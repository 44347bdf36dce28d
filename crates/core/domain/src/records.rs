//! 后端权威记录：应用分配、异常日志、记忆集、后端主机状态。
//!
//! 客户端只读引用这些记录，未识别的字段保留在 `extra` 中，
//! 回写（如更新分配）时原样带回。

use crate::de::flexible_bool;
use crate::streamer::FeatureRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

/// Streamer 与应用结果的绑定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_uuid: Option<String>,
    pub streamer_uuid: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub result_name: String,
    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppAssignment {
    pub fn feature(&self) -> FeatureRef {
        FeatureRef::new(self.app_name.clone(), self.result_name.clone())
    }
}

/// 异常检测日志元数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyLog {
    pub anomaly_uuid: String,
    #[serde(default)]
    pub streamer_uuid: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_starred: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 记忆集（学习到的产品样本簇）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySet {
    pub set_uuid: String,
    #[serde(default)]
    pub streamer_uuid: Option<String>,
    #[serde(default)]
    pub sample_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 后端主机资源状态（总览页的系统卡片）。
///
/// 后端采集失败时各字段为 0，缺失字段同样按 0 处理。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStats {
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
