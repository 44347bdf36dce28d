//! 监控视图：收藏列表叠加快照中的实时状态。

use crate::snapshot::FleetSnapshot;
use domain::FavoriteStreamer;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorItem {
    pub favorite: FavoriteStreamer,
    /// 摄像头当前在线。
    pub live: bool,
    /// 摄像头所在单元当前在线。
    pub unit_online: bool,
    /// 快照中已找不到该摄像头，展示的是收藏时的信息。
    pub stale: bool,
}

/// 按收藏顺序生成监控条目。
pub fn monitor_view(favorites: &[FavoriteStreamer], snapshot: &FleetSnapshot) -> Vec<MonitorItem> {
    favorites
        .iter()
        .map(|favorite| match snapshot.find_camera(&favorite.streamer_uuid) {
            Some((unit, camera)) => MonitorItem {
                favorite: favorite.clone(),
                live: camera.is_alive,
                unit_online: unit.status.is_online(),
                stale: false,
            },
            None => MonitorItem {
                favorite: favorite.clone(),
                live: false,
                unit_online: snapshot
                    .unit_by_ip(&favorite.compute_unit_ip)
                    .is_some_and(|unit| unit.status.is_online()),
                stale: true,
            },
        })
        .collect()
}
