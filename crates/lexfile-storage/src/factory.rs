use crate::{LocalStorage, Storage, StorageError, StorageResult};
use lexfile_core::StorageConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    if config.local_storage_path.is_empty() {
        return Err(StorageError::ConfigError(
            "LOCAL_STORAGE_PATH not configured".to_string(),
        ));
    }

    let storage = LocalStorage::new(
        config.local_storage_path.clone(),
        config.local_storage_base_url.clone(),
    )
    .await?;

    Ok(Arc::new(storage))
}
