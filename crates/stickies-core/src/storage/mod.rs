//! Storage layer
//!
//! Durable key-value storage for the note collection. The store only ever
//! needs string keys mapped to string values, the same contract browser
//! local storage offers.
//!
//! ## Backends
//!
//! - **File**: one JSON file per key, written atomically
//! - **SQLite**: a single `kv` table
//! - **Memory**: nothing survives the process (tests, throwaway sessions)

pub mod error;
pub mod file;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteStorage;

use crate::config::{Config, StorageBackend};

/// Synchronous string key-value store
pub trait KeyValueStorage {
    /// Read a value; `None` if the key was never written or was removed
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Open the backend selected in the configuration
pub fn open_storage(config: &Config) -> StorageResult<Box<dyn KeyValueStorage>> {
    let storage: Box<dyn KeyValueStorage> = match config.storage {
        StorageBackend::File => Box::new(FileStorage::open(config.kv_dir())?),
        StorageBackend::Sqlite => Box::new(SqliteStorage::open(&config.sqlite_path())?),
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };
    tracing::debug!(backend = %config.storage, "opened storage");
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with(temp_dir: &TempDir, storage: StorageBackend) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            storage,
            ..Config::default()
        }
    }

    #[test]
    fn test_open_storage_each_backend() {
        for backend in [
            StorageBackend::File,
            StorageBackend::Sqlite,
            StorageBackend::Memory,
        ] {
            let temp_dir = TempDir::new().unwrap();
            let mut storage = open_storage(&config_with(&temp_dir, backend)).unwrap();

            assert!(storage.get("sticky-notes").unwrap().is_none());
            storage.set("sticky-notes", "[]").unwrap();
            assert_eq!(storage.get("sticky-notes").unwrap().as_deref(), Some("[]"));
            storage.remove("sticky-notes").unwrap();
            assert!(storage.get("sticky-notes").unwrap().is_none());
        }
    }

    #[test]
    fn test_sqlite_backend_creates_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with(&temp_dir, StorageBackend::Sqlite);
        let mut storage = open_storage(&config).unwrap();
        storage.set("k", "v").unwrap();
        assert!(config.sqlite_path().exists());
    }
}
