use fleet_backend::BackendError;
use fleet_storage::StorageError;

/// 同步过程中的错误。
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
