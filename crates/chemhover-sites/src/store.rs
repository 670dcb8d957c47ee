//! Filter list persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chemhover_config::{ConfigLoader, SitesConfig};
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::SitesError;
use crate::filters::UrlFilters;

/// Where the filter list lives between runs.
#[async_trait]
pub trait FilterStore: Send + Sync {
    /// Load the stored list. Anything that is not a list of filters is
    /// replaced by an empty list.
    async fn load(&self) -> Result<UrlFilters, SitesError>;

    async fn save(&self, filters: &UrlFilters) -> Result<(), SitesError>;
}

fn decode(value: Value) -> Option<UrlFilters> {
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn encode(filters: &UrlFilters) -> Result<Value, SitesError> {
    serde_json::to_value(filters).map_err(|e| SitesError::Serialization(e.to_string()))
}

/// In-memory store holding the raw stored value.
pub struct MemoryFilterStore {
    value: RwLock<Value>,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        Self::with_value(Value::Array(Vec::new()))
    }

    /// Start from an arbitrary stored value, as if another writer put it there.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub async fn raw(&self) -> Value {
        self.value.read().await.clone()
    }
}

impl Default for MemoryFilterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilterStore for MemoryFilterStore {
    async fn load(&self) -> Result<UrlFilters, SitesError> {
        let mut value = self.value.write().await;
        match decode(value.clone()) {
            Some(filters) => Ok(filters),
            None => {
                warn!("Stored filters are not a list, resetting");
                *value = Value::Array(Vec::new());
                Ok(UrlFilters::new())
            }
        }
    }

    async fn save(&self, filters: &UrlFilters) -> Result<(), SitesError> {
        *self.value.write().await = encode(filters)?;
        Ok(())
    }
}

/// JSON file store. A missing file reads as an empty list.
pub struct FileFilterStore {
    path: PathBuf,
}

impl FileFilterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SitesConfig) -> Self {
        Self::new(ConfigLoader::expand_path(&config.filters_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FilterStore for FileFilterStore {
    async fn load(&self) -> Result<UrlFilters, SitesError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No filter file at {:?}", self.path);
                return Ok(UrlFilters::new());
            }
            Err(e) => return Err(e.into()),
        };

        let filters = serde_json::from_str::<Value>(&content).ok().and_then(decode);
        match filters {
            Some(filters) => {
                debug!("Loaded {} filters from {:?}", filters.len(), self.path);
                Ok(filters)
            }
            None => {
                warn!("Filter file {:?} is not a list, resetting", self.path);
                let empty = UrlFilters::new();
                self.save(&empty).await?;
                Ok(empty)
            }
        }
    }

    async fn save(&self, filters: &UrlFilters) -> Result<(), SitesError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(filters)
            .map_err(|e| SitesError::Serialization(e.to_string()))?;
        fs::write(&self.path, content).await?;
        debug!("Saved {} filters to {:?}", filters.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
