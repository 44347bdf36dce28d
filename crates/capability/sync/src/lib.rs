//! # Fleet Sync 模块
//!
//! 状态同步器：定时拉取计算单元列表，逐个探活并拉取摄像头，
//! 与上一份快照比较后只在有变化时发布新快照，并把收藏与快照对账。
//!
//! - [`snapshot`]：`FleetSnapshot` 与统计
//! - [`diff`]：快照比较
//! - [`monitor`]：收藏 + 实时状态的监控视图
//! - [`synchronizer`]：轮询主体与后台任务

pub mod diff;
pub mod error;
pub mod monitor;
pub mod snapshot;
pub mod synchronizer;

pub use diff::fleet_changed;
pub use error::SyncError;
pub use monitor::{MonitorItem, monitor_view};
pub use snapshot::{FleetCounts, FleetSnapshot};
pub use synchronizer::{SyncConfig, SyncOutcome, Synchronizer};
