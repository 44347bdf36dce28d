//! 追踪、请求 ID 与同步指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 同步指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub polls: u64,
    pub poll_failures: u64,
    pub snapshot_updates: u64,
    pub unchanged_polls: u64,
    pub ping_failures: u64,
    pub camera_fetch_failures: u64,
    pub status_pushes: u64,
    pub favorites_reconciled: u64,
}

/// 同步指标（进程内计数器）。
pub struct TelemetryMetrics {
    polls: AtomicU64,
    poll_failures: AtomicU64,
    snapshot_updates: AtomicU64,
    unchanged_polls: AtomicU64,
    ping_failures: AtomicU64,
    camera_fetch_failures: AtomicU64,
    status_pushes: AtomicU64,
    favorites_reconciled: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            polls: AtomicU64::new(0),
            poll_failures: AtomicU64::new(0),
            snapshot_updates: AtomicU64::new(0),
            unchanged_polls: AtomicU64::new(0),
            ping_failures: AtomicU64::new(0),
            camera_fetch_failures: AtomicU64::new(0),
            status_pushes: AtomicU64::new(0),
            favorites_reconciled: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            poll_failures: self.poll_failures.load(Ordering::Relaxed),
            snapshot_updates: self.snapshot_updates.load(Ordering::Relaxed),
            unchanged_polls: self.unchanged_polls.load(Ordering::Relaxed),
            ping_failures: self.ping_failures.load(Ordering::Relaxed),
            camera_fetch_failures: self.camera_fetch_failures.load(Ordering::Relaxed),
            status_pushes: self.status_pushes.load(Ordering::Relaxed),
            favorites_reconciled: self.favorites_reconciled.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录一次轮询开始。
pub fn record_poll() {
    metrics().polls.fetch_add(1, Ordering::Relaxed);
}

/// 记录轮询失败（拉取计算单元列表失败）。
pub fn record_poll_failure() {
    metrics().poll_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录快照发布次数。
pub fn record_snapshot_update() {
    metrics().snapshot_updates.fetch_add(1, Ordering::Relaxed);
}

pub fn record_unchanged_poll() {
    metrics().unchanged_polls.fetch_add(1, Ordering::Relaxed);
}

/// 记录计算单元 ping 不可达次数。
pub fn record_ping_failure() {
    metrics().ping_failures.fetch_add(1, Ordering::Relaxed);
}

pub fn record_camera_fetch_failure() {
    metrics()
        .camera_fetch_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录回写后端状态次数。
pub fn record_status_push() {
    metrics().status_pushes.fetch_add(1, Ordering::Relaxed);
}

/// 记录收藏与快照对账后被刷新的条目数。
pub fn record_favorites_reconciled(count: u64) {
    metrics()
        .favorites_reconciled
        .fetch_add(count, Ordering::Relaxed);
}
