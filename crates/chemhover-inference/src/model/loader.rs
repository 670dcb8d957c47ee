//! One-shot model fetchers.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chemhover_protocols::{ClassifierError, ModelLoader, SequenceModel};
use tracing::debug;

use super::ngram::{NgramArtifact, NgramModel};

fn unavailable(source: &str, e: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::ModelUnavailable(format!("{}: {}", source, e))
}

/// Fetches an n-gram artifact over HTTP.
pub struct HttpModelLoader {
    url: String,
    client: reqwest::Client,
}

impl HttpModelLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    fn source(&self) -> &str {
        &self.url
    }

    async fn load(&self) -> Result<Arc<dyn SequenceModel>, ClassifierError> {
        debug!("Fetching model artifact from {}", self.url);
        let artifact: NgramArtifact = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(&self.url, e))?
            .error_for_status()
            .map_err(|e| unavailable(&self.url, e))?
            .json()
            .await
            .map_err(|e| unavailable(&self.url, e))?;
        Ok(Arc::new(NgramModel::from_artifact(artifact)?))
    }
}

/// Reads an n-gram artifact from disk.
pub struct FileModelLoader {
    path: PathBuf,
    source: String,
}

impl FileModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = path.display().to_string();
        Self { path, source }
    }
}

#[async_trait]
impl ModelLoader for FileModelLoader {
    fn source(&self) -> &str {
        &self.source
    }

    async fn load(&self) -> Result<Arc<dyn SequenceModel>, ClassifierError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| unavailable(&self.source, e))?;
        Ok(Arc::new(NgramModel::from_json(&content)?))
    }
}
