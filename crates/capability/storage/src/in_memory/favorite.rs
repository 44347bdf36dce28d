//! 收藏内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::sort_newest_first;
use crate::traits::FavoriteStore;
use domain::FavoriteStreamer;
use std::sync::RwLock;

/// 收藏内存存储
///
/// 使用 RwLock + Vec 提供线程安全的内存存储。
#[derive(Default)]
pub struct InMemoryFavoriteStore {
    items: RwLock<Vec<FavoriteStreamer>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定收藏初始化（测试用）
    pub fn with_items(items: Vec<FavoriteStreamer>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait::async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn list(&self) -> Result<Vec<FavoriteStreamer>, StorageError> {
        let mut items = self
            .items
            .read()
            .map_err(|_| StorageError::Poisoned)?
            .clone();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn find(&self, streamer_uuid: &str) -> Result<Option<FavoriteStreamer>, StorageError> {
        let item = self
            .items
            .read()
            .map_err(|_| StorageError::Poisoned)?
            .iter()
            .find(|item| item.streamer_uuid == streamer_uuid)
            .cloned();
        Ok(item)
    }

    async fn add(&self, favorite: FavoriteStreamer) -> Result<FavoriteStreamer, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        if items
            .iter()
            .any(|item| item.streamer_uuid == favorite.streamer_uuid)
        {
            return Err(StorageError::Conflict(favorite.streamer_uuid));
        }
        items.push(favorite.clone());
        Ok(favorite)
    }

    async fn update(&self, favorite: FavoriteStreamer) -> Result<bool, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        match items
            .iter_mut()
            .find(|item| item.streamer_uuid == favorite.streamer_uuid)
        {
            Some(slot) => {
                *slot = favorite;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, streamer_uuid: &str) -> Result<bool, StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        let before = items.len();
        items.retain(|item| item.streamer_uuid != streamer_uuid);
        Ok(items.len() != before)
    }
}
