//! handler 测试用的内存后端与状态构造。

use crate::AppState;
use async_trait::async_trait;
use axum::response::Response;
use domain::{
    AnomalyLog, AppAssignment, Camera, ComputeUnit, MemorySet, PingMethod, PingReport,
    SystemStats, UnitStatus,
};
use fleet_backend::{AnomalyImage, BackendError, FleetBackend, UnitUpdate};
use fleet_storage::InMemoryFavoriteStore;
use fleet_sync::{SyncConfig, Synchronizer};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// 内存后端：单元与摄像头可预置，写操作记录在 `calls` 中。
#[derive(Default)]
pub struct FakeBackend {
    pub units: Mutex<Vec<ComputeUnit>>,
    pub reachable: Mutex<HashSet<String>>,
    pub cameras: Mutex<HashMap<String, Vec<Camera>>>,
    pub assignments: Mutex<Vec<AppAssignment>>,
    pub logs: Mutex<Vec<AnomalyLog>>,
    pub memory_sets: Mutex<Vec<MemorySet>>,
    pub calls: Mutex<Vec<String>>,
    pub offline: Mutex<bool>,
}

impl FakeBackend {
    pub fn with_unit(id: &str, ip: &str, cameras: Vec<Camera>) -> Self {
        let backend = Self::default();
        backend.units.lock().unwrap().push(ComputeUnit {
            id: id.to_string(),
            name: format!("edge-{id}"),
            ip_address: ip.to_string(),
            status: UnitStatus::Online,
            last_seen: None,
            cameras: vec![],
        });
        backend.reachable.lock().unwrap().insert(ip.to_string());
        backend.cameras.lock().unwrap().insert(ip.to_string(), cameras);
        backend
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if *self.offline.lock().unwrap() {
            return Err(BackendError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn camera(uuid: &str, name: &str, alive: bool) -> Camera {
    Camera {
        streamer_uuid: uuid.to_string(),
        streamer_hr_name: name.to_string(),
        streamer_type: "rtsp".to_string(),
        config_template_name: "default".to_string(),
        is_alive: alive,
        compute_unit_ip: None,
        features: vec!["detector.person".to_string()],
    }
}

#[async_trait]
impl FleetBackend for FakeBackend {
    async fn list_units(&self) -> Result<Vec<ComputeUnit>, BackendError> {
        self.check_online()?;
        Ok(self.units.lock().unwrap().clone())
    }

    async fn add_unit(
        &self,
        ip_address: &str,
        name: Option<&str>,
    ) -> Result<ComputeUnit, BackendError> {
        self.check_online()?;
        let mut units = self.units.lock().unwrap();
        if units.iter().any(|unit| unit.ip_address == ip_address) {
            return Err(BackendError::Status {
                status: 409,
                message: "Compute unit with this IP already exists".to_string(),
            });
        }
        let unit = ComputeUnit {
            id: (units.len() + 1).to_string(),
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| format!("Compute Unit {ip_address}")),
            ip_address: ip_address.to_string(),
            status: UnitStatus::Online,
            last_seen: None,
            cameras: vec![],
        };
        units.push(unit.clone());
        Ok(unit)
    }

    async fn update_unit(&self, id: &str, update: &UnitUpdate) -> Result<ComputeUnit, BackendError> {
        self.check_online()?;
        self.record(format!("update_unit:{id}"));
        let mut units = self.units.lock().unwrap();
        let Some(unit) = units.iter_mut().find(|unit| unit.id == id) else {
            return Err(BackendError::Status {
                status: 404,
                message: "Compute unit not found".to_string(),
            });
        };
        if let Some(status) = update.status {
            unit.status = status;
        }
        if let Some(name) = &update.name {
            unit.name = name.clone();
        }
        Ok(unit.clone())
    }

    async fn delete_unit(&self, id: &str) -> Result<(), BackendError> {
        self.check_online()?;
        let mut units = self.units.lock().unwrap();
        let before = units.len();
        units.retain(|unit| unit.id != id);
        if units.len() == before {
            return Err(BackendError::Status {
                status: 404,
                message: "Compute unit not found".to_string(),
            });
        }
        Ok(())
    }

    async fn list_cameras(&self, unit_ip: &str) -> Result<Vec<Camera>, BackendError> {
        self.check_online()?;
        Ok(self
            .cameras
            .lock()
            .unwrap()
            .get(unit_ip)
            .cloned()
            .unwrap_or_default())
    }

    async fn rename_streamer(&self, streamer_uuid: &str, name: &str) -> Result<(), BackendError> {
        self.check_online()?;
        self.record(format!("rename_streamer:{streamer_uuid}:{name}"));
        for cameras in self.cameras.lock().unwrap().values_mut() {
            for camera in cameras.iter_mut() {
                if camera.streamer_uuid == streamer_uuid {
                    camera.streamer_hr_name = name.to_string();
                }
            }
        }
        Ok(())
    }

    async fn last_frame(&self, streamer_uuid: &str, unit_ip: &str) -> Result<Value, BackendError> {
        self.check_online()?;
        Ok(json!({ "streamer_uuid": streamer_uuid, "compute_unit_ip": unit_ip, "frame": "base64" }))
    }

    async fn supported_apps(&self, unit_ip: &str) -> Result<Value, BackendError> {
        self.check_online()?;
        Ok(json!({ "supported_apps": ["detector"], "unit": unit_ip }))
    }

    async fn list_assignments(
        &self,
        _unit_ip: &str,
        streamer_uuid: Option<&str>,
    ) -> Result<Vec<AppAssignment>, BackendError> {
        self.check_online()?;
        let mut items = self.assignments.lock().unwrap().clone();
        if let Some(streamer_uuid) = streamer_uuid {
            items.retain(|item| item.streamer_uuid == streamer_uuid);
        }
        Ok(items)
    }

    async fn update_assignment(
        &self,
        unit_ip: &str,
        assignment: &AppAssignment,
    ) -> Result<Value, BackendError> {
        self.check_online()?;
        self.record(format!(
            "update_assignment:{unit_ip}:{}",
            assignment.feature()
        ));
        Ok(json!({ "status": "ok" }))
    }

    async fn delete_assignment(
        &self,
        unit_ip: &str,
        assignment_uuid: &str,
    ) -> Result<(), BackendError> {
        self.check_online()?;
        self.record(format!("delete_assignment:{unit_ip}:{assignment_uuid}"));
        Ok(())
    }

    async fn anomaly_logs(&self, _unit_ip: &str) -> Result<Vec<AnomalyLog>, BackendError> {
        self.check_online()?;
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn anomaly_image(
        &self,
        _unit_ip: &str,
        file_path: &str,
    ) -> Result<AnomalyImage, BackendError> {
        self.check_online()?;
        Ok(AnomalyImage {
            bytes: file_path.as_bytes().to_vec(),
            content_type: "image/png".to_string(),
        })
    }

    async fn star_anomaly(
        &self,
        unit_ip: &str,
        anomaly_uuid: &str,
        starred: bool,
    ) -> Result<(), BackendError> {
        self.check_online()?;
        self.record(format!("star_anomaly:{unit_ip}:{anomaly_uuid}:{starred}"));
        Ok(())
    }

    async fn delete_anomaly(&self, unit_ip: &str, anomaly_uuid: &str) -> Result<(), BackendError> {
        self.check_online()?;
        self.record(format!("delete_anomaly:{unit_ip}:{anomaly_uuid}"));
        Ok(())
    }

    async fn memory_sets(&self, _unit_ip: &str) -> Result<Vec<MemorySet>, BackendError> {
        self.check_online()?;
        Ok(self.memory_sets.lock().unwrap().clone())
    }

    async fn memory_set_samples(
        &self,
        _unit_ip: &str,
        set_uuid: &str,
    ) -> Result<Vec<String>, BackendError> {
        self.check_online()?;
        Ok(vec![format!("{set_uuid}-s1"), format!("{set_uuid}-s2")])
    }

    async fn memory_set_thumbnails(
        &self,
        _unit_ip: &str,
        sample_uuids: &[String],
    ) -> Result<Value, BackendError> {
        self.check_online()?;
        Ok(json!({ "thumbnails": sample_uuids }))
    }

    async fn delete_memory_set(&self, unit_ip: &str, set_uuid: &str) -> Result<(), BackendError> {
        self.check_online()?;
        self.record(format!("delete_memory_set:{unit_ip}:{set_uuid}"));
        Ok(())
    }

    async fn system_stats(&self) -> Result<SystemStats, BackendError> {
        self.check_online()?;
        Ok(SystemStats {
            cpu_usage: 12.5,
            uptime: "1 day".to_string(),
            ..SystemStats::default()
        })
    }

    async fn ai_service_health(&self) -> Result<Value, BackendError> {
        self.check_online()?;
        Ok(json!({ "status": "healthy" }))
    }

    async fn streamer_configs(&self, streamer_uuid: &str) -> Result<Value, BackendError> {
        self.check_online()?;
        Ok(json!({ "streamer_uuid": streamer_uuid, "configs": [] }))
    }

    async fn ping_unit(&self, ip: &str) -> PingReport {
        if self.reachable.lock().unwrap().contains(ip) {
            PingReport {
                reachable: true,
                response: "pong".to_string(),
                method: PingMethod::DirectAiPing,
            }
        } else {
            PingReport::unreachable(
                PingMethod::ConnectionRefused,
                "Device not found - connection refused",
            )
        }
    }
}

/// 使用内存收藏与给定后端构造状态（不启动后台同步）。
pub fn test_state(backend: FakeBackend) -> (AppState, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let favorites = Arc::new(InMemoryFavoriteStore::new());
    let sync = Arc::new(Synchronizer::new(
        backend.clone(),
        favorites.clone(),
        SyncConfig {
            reconcile_remote_status: false,
            ..SyncConfig::default()
        },
    ));
    let state = AppState {
        backend: backend.clone(),
        favorites,
        sync,
    };
    (state, backend)
}

/// 读取响应体并解析为 JSON。
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}
