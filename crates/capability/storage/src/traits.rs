//! 存储接口 Trait 定义
//!
//! 设计原则：
//! - 以 `streamer_uuid` 作为收藏主键
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use async_trait::async_trait;
use domain::FavoriteStreamer;

/// 收藏存储接口
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// 列出全部收藏（最新加入在前）
    async fn list(&self) -> Result<Vec<FavoriteStreamer>, StorageError>;

    /// 按视频流 UUID 查找
    async fn find(&self, streamer_uuid: &str) -> Result<Option<FavoriteStreamer>, StorageError>;

    /// 新增收藏，UUID 重复时返回 `Conflict`
    async fn add(&self, favorite: FavoriteStreamer) -> Result<FavoriteStreamer, StorageError>;

    /// 覆盖已有收藏，不存在时返回 false
    async fn update(&self, favorite: FavoriteStreamer) -> Result<bool, StorageError>;

    /// 删除收藏，不存在时返回 false
    async fn remove(&self, streamer_uuid: &str) -> Result<bool, StorageError>;
}
