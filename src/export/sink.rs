//! Destinations for the encoded sheets

use crate::gcp::client::GcpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Somewhere the exported objects are written
#[async_trait]
pub trait InventorySink: Send + Sync {
    /// One-time setup before the first write
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Store one object, returning where it ended up
    async fn put(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Writes objects as files under a local directory
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl InventorySink for DirectorySink {
    async fn put(&self, name: &str, _content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
        Ok(path.display().to_string())
    }
}

/// Uploads objects to a Cloud Storage bucket, creating it if needed
pub struct BucketSink {
    client: GcpClient,
    project: String,
    bucket: String,
}

impl BucketSink {
    pub fn new(client: GcpClient, project: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            project: project.into(),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl InventorySink for BucketSink {
    async fn prepare(&self) -> Result<()> {
        self.client
            .ensure_bucket(&self.project, &self.bucket)
            .await
            .with_context(|| format!("Failed to create bucket gs://{}", self.bucket))
    }

    async fn put(&self, name: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.client
            .upload_object(&self.bucket, name, content_type, bytes)
            .await
            .with_context(|| format!("Failed to upload gs://{}/{}", self.bucket, name))?;
        Ok(format!("gs://{}/{}", self.bucket, name))
    }
}
