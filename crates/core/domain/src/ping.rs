//! 单元探活结果。

use serde::{Deserialize, Serialize};

/// 探活方式/失败原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PingMethod {
    DirectAiPing,
    ConnectionRefused,
    ConnectionTimeout,
    ConnectionFailed,
}

/// 一次探活的结果：只有明确返回 `pong` 才算可达。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingReport {
    pub reachable: bool,
    pub response: String,
    pub method: PingMethod,
}

impl PingReport {
    pub fn unreachable(method: PingMethod, response: impl Into<String>) -> Self {
        Self {
            reachable: false,
            response: response.into(),
            method,
        }
    }
}
