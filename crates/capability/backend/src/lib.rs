//! # Fleet Backend 模块
//!
//! 外部管理后端（REST API）的客户端封装，后端本身是黑盒。
//!
//! - [`traits`]：`FleetBackend` 接口，同步器与控制台只依赖该接口
//! - [`http`]：基于 reqwest 的实现，统一超时、Bearer token 与错误体解析
//! - [`wire`]：响应体兼容处理（裸数组 / 包装对象）
//! - [`error`]：`BackendError`
//!
//! 单元探活 `ping_unit` 直接访问单元自身的 AI 服务，不经过后端。

pub mod error;
pub mod http;
pub mod traits;
pub mod wire;

pub use error::BackendError;
pub use http::{HttpBackendOptions, HttpFleetBackend};
pub use traits::{AnomalyImage, FleetBackend, UnitUpdate};
