//! 摄像头 / Streamer 模型。

use crate::de::flexible_bool;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 挂载在算力单元上的视频源。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub streamer_uuid: String,
    #[serde(default)]
    pub streamer_hr_name: String,
    #[serde(default)]
    pub streamer_type: String,
    #[serde(default)]
    pub config_template_name: String,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_alive: bool,
    #[serde(default)]
    pub compute_unit_ip: Option<String>,
    /// `app_name.result_name` 形式的已分配 feature。
    #[serde(default)]
    pub features: Vec<String>,
}

impl Camera {
    /// 解析 feature 列表，格式非法的条目被跳过。
    pub fn feature_refs(&self) -> Vec<FeatureRef> {
        self.features
            .iter()
            .filter_map(|raw| FeatureRef::parse(raw).ok())
            .collect()
    }

    /// 同步 diff 关心的字段是否一致。
    pub fn same_state(&self, other: &Camera) -> bool {
        self.streamer_uuid == other.streamer_uuid
            && self.streamer_hr_name == other.streamer_hr_name
            && self.is_alive == other.is_alive
            && self.features == other.features
    }
}

/// feature 解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid feature reference: {0}")]
pub struct FeatureRefError(pub String);

/// 应用结果引用：`app_name.result_name`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureRef {
    pub app_name: String,
    pub result_name: String,
}

impl FeatureRef {
    pub fn new(app_name: impl Into<String>, result_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            result_name: result_name.into(),
        }
    }

    /// 分别给出应用名与结果名：应用名非空且不含 `.`，结果名非空。
    ///
    /// 应用名含 `.` 时拼接后再按第一个 `.` 切分会得到另一组名字，因此直接拒绝。
    pub fn from_parts(app_name: &str, result_name: &str) -> Result<Self, FeatureRefError> {
        let app = app_name.trim();
        let result = result_name.trim();
        if app.is_empty() || app.contains('.') || result.is_empty() {
            return Err(FeatureRefError(format!("{app}.{result}")));
        }
        Ok(Self::new(app, result))
    }

    /// 按第一个 `.` 切分，两侧都不能为空。
    pub fn parse(raw: &str) -> Result<Self, FeatureRefError> {
        let trimmed = raw.trim();
        match trimmed.split_once('.') {
            Some((app, result)) if !app.is_empty() && !result.is_empty() => {
                Ok(Self::new(app, result))
            }
            _ => Err(FeatureRefError(trimmed.to_string())),
        }
    }
}

impl fmt::Display for FeatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_name, self.result_name)
    }
}
