//! 同步快照。

use domain::{Camera, ComputeUnit};
use serde::Serialize;

/// 一次成功轮询得到的整体视图。`revision` 每次发布加一，初始为 0。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub units: Vec<ComputeUnit>,
    pub revision: u64,
    pub updated_at_ms: Option<i64>,
}

/// 看板统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetCounts {
    pub units_total: usize,
    pub units_online: usize,
    pub units_offline: usize,
    pub cameras_total: usize,
    pub cameras_live: usize,
}

impl FleetSnapshot {
    pub fn unit(&self, id: &str) -> Option<&ComputeUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_by_ip(&self, ip: &str) -> Option<&ComputeUnit> {
        self.units.iter().find(|unit| unit.ip_address == ip)
    }

    /// 按视频流 UUID 查找摄像头及其所在单元。
    pub fn find_camera(&self, streamer_uuid: &str) -> Option<(&ComputeUnit, &Camera)> {
        self.units.iter().find_map(|unit| {
            unit.cameras
                .iter()
                .find(|camera| camera.streamer_uuid == streamer_uuid)
                .map(|camera| (unit, camera))
        })
    }

    pub fn counts(&self) -> FleetCounts {
        let units_online = self
            .units
            .iter()
            .filter(|unit| unit.status.is_online())
            .count();
        let cameras = self.units.iter().flat_map(|unit| unit.cameras.iter());
        let (cameras_total, cameras_live) = cameras.fold((0, 0), |(total, live), camera| {
            (total + 1, live + usize::from(camera.is_alive))
        });
        FleetCounts {
            units_total: self.units.len(),
            units_online,
            units_offline: self.units.len() - units_online,
            cameras_total,
            cameras_live,
        }
    }
}
