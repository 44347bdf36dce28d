//! 响应体兼容处理。
//!
//! 后端对列表既可能返回裸数组，也可能包在 `{"compute_units": [...]}`、
//! `{"payload": [...]}` 之类的对象里；错误体可能是 `message` 或 `error`。

use crate::error::BackendError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// 列表包装对象中可能出现的字段名。
pub const LIST_KEYS: &[&str] = &[
    "compute_units",
    "payload",
    "cameras",
    "assignments",
    "logs",
    "anomaly_logs",
    "metadata",
    "rows",
    "memory_sets",
    "data",
    "items",
];

/// 取出列表：裸数组直接返回，对象按 `keys` 顺序找第一个数组字段。
pub fn extract_list(value: Value, keys: &[&str]) -> Result<Vec<Value>, BackendError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in keys {
                if let Some(Value::Array(items)) = map.remove(*key) {
                    return Ok(items);
                }
            }
            Err(BackendError::Decode(format!(
                "expected a list under one of {keys:?}"
            )))
        }
        Value::Null => Ok(Vec::new()),
        other => Err(BackendError::Decode(format!(
            "expected a list, got {}",
            type_name(&other)
        ))),
    }
}

/// 取出单个对象：`{"compute_unit": {...}}` 解包，否则原样返回。
pub fn extract_object(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if matches!(map.get(key), Some(Value::Object(_))) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// 逐条解码，无法解码的条目跳过并告警。
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>, kind: &str) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() != total {
        warn!(kind, skipped = total - decoded.len(), "skipped malformed backend records");
    }
    decoded
}

/// 从错误响应体提取可读信息。
pub fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(Value::String(message)) = map.get(key) {
                return Some(message.clone());
            }
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(200).collect())
    }
}

/// 样本 UUID：支持 `{"sample_uuids": [...]}`、`{"thumbnails": [{"sample_uuid"}]}` 与裸数组。
pub fn sample_uuids(value: Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match (map.remove("sample_uuids"), map.remove("thumbnails")) {
            (Some(Value::Array(items)), _) | (_, Some(Value::Array(items))) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    let uuids = items.into_iter().filter_map(|item| match item {
        Value::String(uuid) => Some(uuid),
        Value::Object(mut map) => match map.remove("sample_uuid") {
            Some(Value::String(uuid)) => Some(uuid),
            _ => None,
        },
        _ => None,
    });
    dedup_preserving_order(uuids.filter(|uuid| !uuid.is_empty()))
}

pub fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
