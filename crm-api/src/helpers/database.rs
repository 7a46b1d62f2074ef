use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{get_data_dir, ApiConfig, StorageBackend};
use crate::storage::{JsonFileStore, SharedStore, SqliteStore};

/// Returns where the configured backend keeps its data
///
/// # Platform-specific defaults
///
/// - **macOS**: `~/Library/Application Support/pipeline-crm/`
/// - **Linux**: `~/.local/share/pipeline-crm/`
/// - **Windows**: `%LOCALAPPDATA%\pipeline-crm\`
///
/// The SQLite backend uses `crm.sqlite3` in that directory, the JSON backend
/// the `collections/` subdirectory.
pub fn get_store_path(config: &ApiConfig) -> anyhow::Result<PathBuf> {
    let storage = config.storage();
    if let Some(path) = storage.path {
        return Ok(path);
    }

    let data_dir = get_data_dir()?;
    Ok(match storage.backend {
        StorageBackend::Sqlite => data_dir.join("crm.sqlite3"),
        StorageBackend::Json => data_dir.join("collections"),
    })
}

/// Open the configured store, creating files and schema on first use
pub fn initialize_store(config: &ApiConfig) -> anyhow::Result<SharedStore> {
    let path = get_store_path(config)?;

    let store: SharedStore = match config.storage().backend {
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&path, config.owner_id())?),
        StorageBackend::Json => Arc::new(JsonFileStore::open(&path)?),
    };

    tracing::info!(
        "Storage initialized: backend={:?}, path={}",
        config.storage().backend,
        path.display()
    );

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn config_with(backend: StorageBackend, path: PathBuf) -> ApiConfig {
        ApiConfig {
            storage: Some(StorageConfig {
                backend,
                path: Some(path),
            }),
            ..ApiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_initialize_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(StorageBackend::Json, dir.path().join("collections"));

        let store = initialize_store(&config).unwrap();

        store.ping().await.unwrap();
        assert!(dir.path().join("collections").join("deals.json").exists());
    }

    #[tokio::test]
    async fn test_initialize_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(StorageBackend::Sqlite, dir.path().join("crm.sqlite3"));

        let store = initialize_store(&config).unwrap();

        store.ping().await.unwrap();
        assert!(store.list_contacts().await.unwrap().is_empty());
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = config_with(StorageBackend::Sqlite, PathBuf::from("/srv/crm.db"));
        assert_eq!(get_store_path(&config).unwrap(), PathBuf::from("/srv/crm.db"));
    }
}
