//! 算力单元模型。

use crate::de::string_or_number;
use crate::streamer::Camera;
use serde::{Deserialize, Serialize};

/// 算力单元在线状态。
///
/// 后端只会写入 `online`/`offline`，其他值统一落到 `Unknown`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Online => "online",
            UnitStatus::Offline => "offline",
            UnitStatus::Unknown => "unknown",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, UnitStatus::Online)
    }
}

impl From<String> for UnitStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => UnitStatus::Online,
            "offline" => UnitStatus::Offline,
            _ => UnitStatus::Unknown,
        }
    }
}

impl From<UnitStatus> for String {
    fn from(value: UnitStatus) -> Self {
        value.as_str().to_string()
    }
}

/// 算力单元（边缘设备），承载摄像头流与检测应用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeUnit {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub ip_address: String,
    #[serde(default)]
    pub status: UnitStatus,
    /// 后端格式 `%Y-%m-%d %H:%M:%S`，原样透传。
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub cameras: Vec<Camera>,
}

impl ComputeUnit {
    /// 比较同步关心的身份字段（id/状态/名称/IP），忽略 last_seen。
    pub fn same_identity(&self, other: &ComputeUnit) -> bool {
        self.id == other.id
            && self.status == other.status
            && self.name == other.name
            && self.ip_address == other.ip_address
    }
}

/// 拼出单元 AI 服务的根地址。
///
/// IP 自带端口时原样使用，否则补上默认端口；已带 scheme 时保留，缺省为 `http`。
pub fn unit_base_url(ip: &str, default_port: u16) -> String {
    let trimmed = ip.trim().trim_end_matches('/');
    let (scheme, host) = trimmed.split_once("://").unwrap_or(("http", trimmed));
    if host.contains(':') {
        format!("{scheme}://{host}")
    } else {
        format!("{scheme}://{host}:{default_port}")
    }
}
