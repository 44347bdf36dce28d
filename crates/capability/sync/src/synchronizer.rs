//! 轮询同步器。

use crate::diff::fleet_changed;
use crate::error::SyncError;
use crate::monitor::{MonitorItem, monitor_view};
use crate::snapshot::FleetSnapshot;
use domain::{Camera, ComputeUnit, UnitStatus, now_epoch_ms};
use fleet_backend::{FleetBackend, UnitUpdate};
use fleet_storage::FavoriteStore;
use fleet_telemetry::{
    record_camera_fetch_failure, record_favorites_reconciled, record_ping_failure, record_poll,
    record_poll_failure, record_snapshot_update, record_status_push, record_unchanged_poll,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// 同步配置。
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub poll_interval: Duration,
    /// 观测到的在线状态与后端不一致时回写后端。
    pub reconcile_remote_status: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            reconcile_remote_status: true,
        }
    }
}

/// 单次轮询结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 发布了新快照，携带新 revision。
    Updated(u64),
    Unchanged,
    /// 拉取单元列表失败，保留上一份快照。
    Failed(String),
}

pub struct Synchronizer {
    backend: Arc<dyn FleetBackend>,
    favorites: Arc<dyn FavoriteStore>,
    config: SyncConfig,
    state: watch::Sender<Arc<FleetSnapshot>>,
}

impl Synchronizer {
    pub fn new(
        backend: Arc<dyn FleetBackend>,
        favorites: Arc<dyn FavoriteStore>,
        config: SyncConfig,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(FleetSnapshot::default()));
        Self {
            backend,
            favorites,
            config,
            state,
        }
    }

    /// 当前快照。
    pub fn snapshot(&self) -> Arc<FleetSnapshot> {
        self.state.borrow().clone()
    }

    /// 快照尚未建立（revision 为 0）时先同步一次，返回当前快照。
    ///
    /// 首次轮询失败时返回失败原因，调用方决定是报错还是展示空数据。
    pub async fn ensure_snapshot(&self) -> Result<Arc<FleetSnapshot>, String> {
        if self.snapshot().revision == 0
            && let SyncOutcome::Failed(reason) = self.poll_once().await
        {
            return Err(reason);
        }
        Ok(self.snapshot())
    }

    /// 订阅快照变化。
    pub fn subscribe(&self) -> watch::Receiver<Arc<FleetSnapshot>> {
        self.state.subscribe()
    }

    /// 收藏列表叠加当前快照。
    pub async fn monitor(&self) -> Result<Vec<MonitorItem>, SyncError> {
        let favorites = self.favorites.list().await?;
        Ok(monitor_view(&favorites, &self.snapshot()))
    }

    /// 执行一次轮询。与后台任务并发调用时以最后发布的为准，revision 单调递增。
    pub async fn poll_once(&self) -> SyncOutcome {
        record_poll();
        let units = match self.backend.list_units().await {
            Ok(units) => units,
            Err(err) => {
                record_poll_failure();
                warn!(target: "fleet.sync", error = %err, "sync_list_units_failed");
                return SyncOutcome::Failed(err.to_string());
            }
        };

        let previous = self.snapshot();
        let observed = join_all(units.into_iter().map(|unit| {
            let prior = previous.unit(&unit.id).cloned();
            self.observe_unit(unit, prior)
        }))
        .await;

        let now_ms = now_epoch_ms();
        let mut published = None;
        self.state.send_if_modified(|current| {
            if current.revision > 0 && !fleet_changed(&current.units, &observed) {
                return false;
            }
            let revision = current.revision + 1;
            *current = Arc::new(FleetSnapshot {
                units: observed.clone(),
                revision,
                updated_at_ms: Some(now_ms),
            });
            published = Some(revision);
            true
        });

        if let Err(err) = self.reconcile_favorites(&observed).await {
            warn!(target: "fleet.sync", error = %err, "sync_favorites_reconcile_failed");
        }

        match published {
            Some(revision) => {
                record_snapshot_update();
                info!(
                    target: "fleet.sync",
                    revision,
                    units = observed.len(),
                    "sync_snapshot_published"
                );
                SyncOutcome::Updated(revision)
            }
            None => {
                record_unchanged_poll();
                debug!(target: "fleet.sync", "sync_snapshot_unchanged");
                SyncOutcome::Unchanged
            }
        }
    }

    /// 探活单个单元并刷新其摄像头列表。
    async fn observe_unit(&self, mut unit: ComputeUnit, prior: Option<ComputeUnit>) -> ComputeUnit {
        let prior_cameras = prior.map(|unit| unit.cameras).unwrap_or_default();
        let report = self.backend.ping_unit(&unit.ip_address).await;
        let observed = if report.reachable {
            UnitStatus::Online
        } else {
            UnitStatus::Offline
        };

        unit.cameras = if report.reachable {
            match self.backend.list_cameras(&unit.ip_address).await {
                Ok(cameras) => cameras,
                Err(err) => {
                    record_camera_fetch_failure();
                    warn!(
                        target: "fleet.sync",
                        unit_id = %unit.id,
                        ip = %unit.ip_address,
                        error = %err,
                        "sync_camera_fetch_failed"
                    );
                    prior_cameras
                }
            }
        } else {
            record_ping_failure();
            debug!(
                target: "fleet.sync",
                unit_id = %unit.id,
                ip = %unit.ip_address,
                method = ?report.method,
                response = %report.response,
                "sync_unit_unreachable"
            );
            prior_cameras.into_iter().map(mark_not_alive).collect()
        };

        if unit.status != observed {
            if self.config.reconcile_remote_status {
                self.push_status(&mut unit, observed).await;
            }
            unit.status = observed;
        }
        unit
    }

    async fn push_status(&self, unit: &mut ComputeUnit, observed: UnitStatus) {
        match self
            .backend
            .update_unit(&unit.id, &UnitUpdate::status(observed))
            .await
        {
            Ok(updated) => {
                record_status_push();
                info!(
                    target: "fleet.sync",
                    unit_id = %unit.id,
                    from = unit.status.as_str(),
                    to = observed.as_str(),
                    "sync_status_pushed"
                );
                if updated.last_seen.is_some() {
                    unit.last_seen = updated.last_seen;
                }
            }
            Err(err) => {
                warn!(
                    target: "fleet.sync",
                    unit_id = %unit.id,
                    error = %err,
                    "sync_status_push_failed"
                );
            }
        }
    }

    /// 收藏对账：摄像头仍存在的收藏同步名称、在线状态与单元 IP。
    async fn reconcile_favorites(&self, units: &[ComputeUnit]) -> Result<(), SyncError> {
        let favorites = self.favorites.list().await?;
        let mut refreshed = 0u64;
        for mut favorite in favorites {
            let found = units.iter().find_map(|unit| {
                unit.cameras
                    .iter()
                    .find(|camera| camera.streamer_uuid == favorite.streamer_uuid)
                    .map(|camera| (unit, camera))
            });
            let Some((unit, camera)) = found else {
                continue;
            };
            let unit_ip = camera
                .compute_unit_ip
                .as_deref()
                .unwrap_or(&unit.ip_address);
            if favorite.refresh_from(camera, unit_ip) && self.favorites.update(favorite).await? {
                refreshed += 1;
            }
        }
        if refreshed > 0 {
            record_favorites_reconciled(refreshed);
            info!(target: "fleet.sync", refreshed, "sync_favorites_refreshed");
        }
        Ok(())
    }

    /// 后台定时轮询。第一次轮询立即执行。
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                target: "fleet.sync",
                interval_ms = self.config.poll_interval.as_millis() as u64,
                "sync_loop_started"
            );
            loop {
                ticker.tick().await;
                self.poll_once().await;
            }
        })
    }
}

fn mark_not_alive(mut camera: Camera) -> Camera {
    camera.is_alive = false;
    camera
}
