//! 快照比较：只关心单元 id/状态/名称/IP 与摄像头 uuid/名称/在线/feature。
//!
//! 顺序变化与 `last_seen` 变化不算变化。

use domain::{Camera, ComputeUnit};
use std::collections::HashMap;

/// 两份单元列表是否存在需要发布的差异。
pub fn fleet_changed(previous: &[ComputeUnit], next: &[ComputeUnit]) -> bool {
    if previous.len() != next.len() {
        return true;
    }
    let by_id: HashMap<&str, &ComputeUnit> = previous
        .iter()
        .map(|unit| (unit.id.as_str(), unit))
        .collect();
    if by_id.len() != previous.len() {
        return previous != next;
    }
    next.iter().any(|unit| match by_id.get(unit.id.as_str()) {
        Some(old) => !old.same_identity(unit) || cameras_changed(&old.cameras, &unit.cameras),
        None => true,
    })
}

fn cameras_changed(previous: &[Camera], next: &[Camera]) -> bool {
    if previous.len() != next.len() {
        return true;
    }
    let by_uuid: HashMap<&str, &Camera> = previous
        .iter()
        .map(|camera| (camera.streamer_uuid.as_str(), camera))
        .collect();
    next.iter()
        .any(|camera| match by_uuid.get(camera.streamer_uuid.as_str()) {
            Some(old) => !old.same_state(camera),
            None => true,
        })
}
