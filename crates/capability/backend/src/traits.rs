//! 后端接口 Trait 定义
//!
//! 设计原则：
//! - 计算单元以 IP 寻址其上的摄像头、应用、日志与记忆集
//! - 透传型数据（应用列表、视频流配置、缩略图、最后一帧、AI 服务健康）以 `serde_json::Value` 返回
//! - 使用 async_trait 支持动态分发，测试可替换为内存实现

use crate::error::BackendError;
use async_trait::async_trait;
use domain::{
    AnomalyLog, AppAssignment, Camera, ComputeUnit, MemorySet, PingReport, SystemStats,
    UnitStatus,
};
use serde::Serialize;
use serde_json::Value;

/// 计算单元更新（状态回写 / 重命名）。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UnitUpdate {
    pub fn status(status: UnitStatus) -> Self {
        Self {
            status: Some(status),
            name: None,
        }
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            status: None,
            name: Some(name.into()),
        }
    }
}

/// 异常日志图片原始内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// 外部管理后端接口
#[async_trait]
pub trait FleetBackend: Send + Sync {
    /// 列出全部计算单元
    async fn list_units(&self) -> Result<Vec<ComputeUnit>, BackendError>;

    /// 注册计算单元（后端负责唯一性与探活校验）
    async fn add_unit(
        &self,
        ip_address: &str,
        name: Option<&str>,
    ) -> Result<ComputeUnit, BackendError>;

    async fn update_unit(&self, id: &str, update: &UnitUpdate)
        -> Result<ComputeUnit, BackendError>;

    async fn delete_unit(&self, id: &str) -> Result<(), BackendError>;

    /// 列出单元上的摄像头，缺少 `compute_unit_ip` 的条目补上 `unit_ip`
    async fn list_cameras(&self, unit_ip: &str) -> Result<Vec<Camera>, BackendError>;

    async fn rename_streamer(&self, streamer_uuid: &str, name: &str) -> Result<(), BackendError>;

    /// 获取视频流最后一帧（透传）
    async fn last_frame(&self, streamer_uuid: &str, unit_ip: &str) -> Result<Value, BackendError>;

    async fn supported_apps(&self, unit_ip: &str) -> Result<Value, BackendError>;

    /// 列出应用分配；给定 `streamer_uuid` 时只保留该视频流的分配
    async fn list_assignments(
        &self,
        unit_ip: &str,
        streamer_uuid: Option<&str>,
    ) -> Result<Vec<AppAssignment>, BackendError>;

    async fn update_assignment(
        &self,
        unit_ip: &str,
        assignment: &AppAssignment,
    ) -> Result<Value, BackendError>;

    async fn delete_assignment(
        &self,
        unit_ip: &str,
        assignment_uuid: &str,
    ) -> Result<(), BackendError>;

    async fn anomaly_logs(&self, unit_ip: &str) -> Result<Vec<AnomalyLog>, BackendError>;

    async fn anomaly_image(
        &self,
        unit_ip: &str,
        file_path: &str,
    ) -> Result<AnomalyImage, BackendError>;

    async fn star_anomaly(
        &self,
        unit_ip: &str,
        anomaly_uuid: &str,
        starred: bool,
    ) -> Result<(), BackendError>;

    async fn delete_anomaly(&self, unit_ip: &str, anomaly_uuid: &str)
        -> Result<(), BackendError>;

    async fn memory_sets(&self, unit_ip: &str) -> Result<Vec<MemorySet>, BackendError>;

    /// 记忆集样本 UUID，去重且保持顺序
    async fn memory_set_samples(
        &self,
        unit_ip: &str,
        set_uuid: &str,
    ) -> Result<Vec<String>, BackendError>;

    async fn memory_set_thumbnails(
        &self,
        unit_ip: &str,
        sample_uuids: &[String],
    ) -> Result<Value, BackendError>;

    async fn delete_memory_set(&self, unit_ip: &str, set_uuid: &str) -> Result<(), BackendError>;

    /// 后端主机资源状态
    async fn system_stats(&self) -> Result<SystemStats, BackendError>;

    /// 后端所连 AI 服务的健康检查（透传）；AI 服务不可用时后端返回 5xx
    async fn ai_service_health(&self) -> Result<Value, BackendError>;

    /// 视频流在 AI 服务上的配置（透传）
    async fn streamer_configs(&self, streamer_uuid: &str) -> Result<Value, BackendError>;

    /// 直接探测单元 AI 服务，失败不返回错误而是不可达报告
    async fn ping_unit(&self, ip: &str) -> PingReport;
}
