//! Settings storage backends.
//!
//! Stores are namespaced: two stores with different namespaces never see
//! each other's keys, mirroring per-extension storage areas.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SettingsError;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Async key-value settings storage.
///
/// Writes are last-write-wins; the store is never used as a lock.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a raw value.
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, SettingsError>;

    /// Write a raw value.
    async fn set_raw(&self, key: &str, value: Value) -> Result<(), SettingsError>;

    /// Remove a key.
    async fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// The namespace this store serves.
    fn namespace(&self) -> &str;
}

/// In-memory settings store for tests and short-lived embedding.
pub struct MemorySettingsStore {
    namespace: String,
    values: RwLock<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new("coursepilot")
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let mut values = self.values.write().await;
        values.remove(key);
        Ok(())
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// File-backed settings store.
///
/// The whole namespace lives in a single JSON document:
/// ```text
/// {storage_path}/
/// └── {namespace}.json
/// ```
/// Values are held in memory and written through on every set, so a crash
/// loses at most the write in flight.
pub struct FileSettingsStore {
    namespace: String,
    path: PathBuf,
    values: RwLock<HashMap<String, Value>>,
}

impl FileSettingsStore {
    /// Open (or create) the store for a namespace under `storage_path`.
    pub async fn new(
        storage_path: impl Into<PathBuf>,
        namespace: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        let namespace = namespace.into();
        let storage_path = storage_path.into();
        fs::create_dir_all(&storage_path).await?;

        let path = storage_path.join(format!("{namespace}.json"));
        let values = match fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        debug!(?path, namespace, "settings store opened");
        Ok(Self {
            namespace,
            path,
            values: RwLock::new(values),
        })
    }

    async fn flush(&self, values: &HashMap<String, Value>) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        self.flush(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let mut values = self.values.write().await;
        values.remove(key);
        self.flush(&values).await
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Typed convenience layer over a [`SettingsStore`].
#[derive(Clone)]
pub struct SettingsHandle {
    store: Arc<dyn SettingsStore>,
}

impl SettingsHandle {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// An in-memory handle, for tests and defaults.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySettingsStore::default()))
    }

    /// Read and deserialize a value.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.store.get_raw(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Read a value, falling back to a default when absent.
    pub async fn get_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Serialize and write a value.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        self.store.set_raw(key, serde_json::to_value(value)?).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.store.remove(key).await
    }

    pub fn store(&self) -> Arc<dyn SettingsStore> {
        self.store.clone()
    }
}
