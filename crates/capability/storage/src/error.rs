//! 存储层错误类型
//!
//! - 重复收藏
//! - 文件读写错误
//! - 序列化错误

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("favorite already exists: {0}")]
    Conflict(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}
