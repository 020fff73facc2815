//! Cloud Storage helpers used by the export step

use super::client::GcpClient;
use crate::error::ApiError;
use serde_json::json;

impl GcpClient {
    /// Whether a bucket exists and is visible to the caller
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool, ApiError> {
        let url = self.storage_url(&format!("b/{}", urlencoding::encode(bucket)));
        match self.get(&url).await {
            Ok(_) => Ok(true),
            Err(ApiError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create a bucket owned by `project`
    pub async fn create_bucket(&self, project: &str, bucket: &str) -> Result<(), ApiError> {
        let url = self.storage_url(&format!("b?project={}", urlencoding::encode(project)));
        self.post(&url, Some(&json!({ "name": bucket }))).await?;
        tracing::info!("Created bucket gs://{} in project {}", bucket, project);
        Ok(())
    }

    pub async fn ensure_bucket(&self, project: &str, bucket: &str) -> Result<(), ApiError> {
        if self.bucket_exists(bucket).await? {
            return Ok(());
        }
        self.create_bucket(project, bucket).await
    }

    /// Simple media upload of one object
    pub async fn upload_object(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            self.endpoints.storage_upload,
            urlencoding::encode(bucket),
            urlencoding::encode(name)
        );
        self.post_bytes(&url, content_type, bytes).await?;
        Ok(())
    }
}
