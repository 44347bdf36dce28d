//! # Fleet Storage 模块
//!
//! 控制台本地持久化：收藏的视频流（favorites）。
//!
//! 计算单元、摄像头等数据由外部管理后端持有，这里只保存控制台自己的状态。
//!
//! ## 模块说明
//!
//! - [`traits`]：`FavoriteStore` 存储接口
//! - [`error`]：存储错误类型
//! - [`in_memory`]：内存实现，`RwLock<Vec>`，用于测试和演示
//! - [`file`]：JSON 文件实现，每次变更整体重写（临时文件 + rename）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use fleet_storage::{FavoriteStore, FileFavoriteStore};
//!
//! let store = FileFavoriteStore::open("favorites.json").await?;
//! let items = store.list().await?;
//! ```

pub mod error;
pub mod file;
pub mod in_memory;
pub mod traits;

pub use error::*;
pub use file::FileFavoriteStore;
pub use in_memory::InMemoryFavoriteStore;
pub use traits::*;

use domain::FavoriteStreamer;

/// 按加入时间倒序（最新在前）。
pub(crate) fn sort_newest_first(items: &mut [FavoriteStreamer]) {
    items.sort_by(|a, b| b.added_at_ms.cmp(&a.added_at_ms));
}
