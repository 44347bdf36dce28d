//! 本地收藏的 Streamer。
//!
//! 收藏是 Camera 的非规范化快照，生命周期独立于后端：
//! 单元被删除后收藏仍然保留，由同步器在摄像头重新出现时刷新。

use crate::streamer::Camera;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStreamer {
    pub streamer_uuid: String,
    pub streamer_hr_name: String,
    pub streamer_type: String,
    pub config_template_name: String,
    #[serde(rename = "computeUnitIP")]
    pub compute_unit_ip: String,
    #[serde(default)]
    pub is_alive: bool,
    #[serde(default)]
    pub features: Vec<String>,
    pub added_at_ms: i64,
}

impl FavoriteStreamer {
    /// 从摄像头构造收藏快照；摄像头未带单元 IP 时使用 `unit_ip`。
    pub fn from_camera(camera: &Camera, unit_ip: &str, now_ms: i64) -> Self {
        Self {
            streamer_uuid: camera.streamer_uuid.clone(),
            streamer_hr_name: camera.streamer_hr_name.clone(),
            streamer_type: camera.streamer_type.clone(),
            config_template_name: camera.config_template_name.clone(),
            compute_unit_ip: camera
                .compute_unit_ip
                .clone()
                .unwrap_or_else(|| unit_ip.to_string()),
            is_alive: camera.is_alive,
            features: camera.features.clone(),
            added_at_ms: now_ms,
        }
    }

    /// 用摄像头的最新状态刷新快照，返回是否有字段变化。
    pub fn refresh_from(&mut self, camera: &Camera, unit_ip: &str) -> bool {
        let mut changed = false;
        if self.streamer_hr_name != camera.streamer_hr_name {
            self.streamer_hr_name = camera.streamer_hr_name.clone();
            changed = true;
        }
        if self.streamer_type != camera.streamer_type {
            self.streamer_type = camera.streamer_type.clone();
            changed = true;
        }
        if self.config_template_name != camera.config_template_name {
            self.config_template_name = camera.config_template_name.clone();
            changed = true;
        }
        if self.is_alive != camera.is_alive {
            self.is_alive = camera.is_alive;
            changed = true;
        }
        if self.features != camera.features {
            self.features = camera.features.clone();
            changed = true;
        }
        if self.compute_unit_ip != unit_ip {
            self.compute_unit_ip = unit_ip.to_string();
            changed = true;
        }
        changed
    }
}
