//! 边缘算力单元（Compute Unit）管控台的领域模型。
//!
//! - `unit`：算力单元与在线状态
//! - `streamer`：摄像头/Streamer 与其挂载的 feature
//! - `favorite`：本地收藏的 Streamer 快照
//! - `records`：应用分配、异常日志、记忆集、主机状态（后端权威数据，只读引用）
//! - `ping`：单元探活结果

pub mod favorite;
pub mod ping;
pub mod records;
pub mod streamer;
pub mod unit;

mod de;

pub use favorite::FavoriteStreamer;
pub use ping::{PingMethod, PingReport};
pub use records::{AnomalyLog, AppAssignment, MemorySet, SystemStats};
pub use streamer::{Camera, FeatureRef, FeatureRefError};
pub use unit::{ComputeUnit, UnitStatus, unit_base_url};

/// 算力单元 AI 服务的默认端口。
pub const DEFAULT_UNIT_PORT: u16 = 8000;

/// 获取当前 Unix 时间戳（毫秒）
pub fn now_epoch_ms() -> i64 {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_millis() as i64
}
