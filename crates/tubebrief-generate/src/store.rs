//! Artifact storage.
//!
//! Generated PNGs and MP3s are written to an object store under
//! content-addressed keys and served from a public base URL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::debug;

use tubebrief_core::config::StorageConfig;
use tubebrief_core::{Error, Result};

/// Object store for generated artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store bytes under a key and return the public URL.
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Content-addressed key for an artifact: `<prefix>/<hash>.<extension>`.
pub fn artifact_key(prefix: &str, bytes: &[u8], extension: &str) -> String {
    let digest = Sha256::digest(bytes);
    format!("{}/{}.{}", prefix, hex::encode(&digest[..16]), extension)
}

/// Artifact store backed by an HTTP object-store endpoint (S3-compatible
/// presigned uploads or a plain PUT-accepting service).
pub struct HttpArtifactStore {
    client: Client,
    endpoint: String,
    public_base_url: String,
}

impl HttpArtifactStore {
    /// Create a new store from configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint,
            public_base_url: config.public_base_url,
        }
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let size = bytes.len();

        let response = self
            .client
            .put(format!("{}/{}", self.endpoint, key))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("upload request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "object store returned {} for {}",
                response.status(),
                key
            )));
        }

        debug!(key, size, "Artifact stored");
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// In-memory artifact store for tests.
#[derive(Clone, Default)]
pub struct InMemoryArtifactStore {
    objects: Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch stored bytes for assertions.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, bytes)| bytes.clone())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(format!("mem://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_keys_are_content_addressed() {
        let a = artifact_key("mindmaps", b"same bytes", "png");
        let b = artifact_key("mindmaps", b"same bytes", "png");
        let c = artifact_key("mindmaps", b"other bytes", "png");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("mindmaps/"));
        assert!(a.ends_with(".png"));
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() {
        let store = InMemoryArtifactStore::new();
        let url = store
            .put("audio/abc.mp3", "audio/mpeg", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(url, "mem://audio/abc.mp3");
        assert_eq!(store.get("audio/abc.mp3"), Some(vec![1, 2, 3]));
    }
}
