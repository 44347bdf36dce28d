//! 收藏 JSON 文件存储实现
//!
//! 文件内容为收藏数组。启动时整体加载到内存，每次变更整体重写：
//! 先写 `<path>.tmp`，再 rename 覆盖，避免写一半的文件。

use crate::error::StorageError;
use crate::sort_newest_first;
use crate::traits::FavoriteStore;
use domain::FavoriteStreamer;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

pub struct FileFavoriteStore {
    path: PathBuf,
    items: Mutex<Vec<FavoriteStreamer>>,
}

impl FileFavoriteStore {
    /// 打开收藏文件。
    ///
    /// 文件不存在视为空列表；文件损坏时记录告警并按空列表处理，下次写入会覆盖。
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = load_items(&path).await?;
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    async fn persist(&self, items: &[FavoriteStreamer]) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(items)?;
        let tmp = tmp_path(&self.path);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn load_items(path: &Path) -> Result<Vec<FavoriteStreamer>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "favorites file unreadable");
            return Ok(Vec::new());
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    match serde_json::from_slice::<Vec<FavoriteStreamer>>(&bytes) {
        Ok(items) => Ok(items),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "favorites file corrupt, starting empty");
            Ok(Vec::new())
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait::async_trait]
impl FavoriteStore for FileFavoriteStore {
    async fn list(&self) -> Result<Vec<FavoriteStreamer>, StorageError> {
        let mut items = self.items.lock().await.clone();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn find(&self, streamer_uuid: &str) -> Result<Option<FavoriteStreamer>, StorageError> {
        let items = self.items.lock().await;
        Ok(items
            .iter()
            .find(|item| item.streamer_uuid == streamer_uuid)
            .cloned())
    }

    async fn add(&self, favorite: FavoriteStreamer) -> Result<FavoriteStreamer, StorageError> {
        let mut items = self.items.lock().await;
        if items
            .iter()
            .any(|item| item.streamer_uuid == favorite.streamer_uuid)
        {
            return Err(StorageError::Conflict(favorite.streamer_uuid));
        }
        let mut next = items.clone();
        next.push(favorite.clone());
        self.persist(&next).await?;
        *items = next;
        Ok(favorite)
    }

    async fn update(&self, favorite: FavoriteStreamer) -> Result<bool, StorageError> {
        let mut items = self.items.lock().await;
        let Some(index) = items
            .iter()
            .position(|item| item.streamer_uuid == favorite.streamer_uuid)
        else {
            return Ok(false);
        };
        let mut next = items.clone();
        next[index] = favorite;
        self.persist(&next).await?;
        *items = next;
        Ok(true)
    }

    async fn remove(&self, streamer_uuid: &str) -> Result<bool, StorageError> {
        let mut items = self.items.lock().await;
        let next: Vec<FavoriteStreamer> = items
            .iter()
            .filter(|item| item.streamer_uuid != streamer_uuid)
            .cloned()
            .collect();
        if next.len() == items.len() {
            return Ok(false);
        }
        self.persist(&next).await?;
        *items = next;
        Ok(true)
    }
}
