//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use crate::error::ApiError;
use crate::resource::{ListRequest, ListingService, Page};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Base URLs of the APIs the inventory talks to
///
/// Overridable so tests can point the client at a mock server.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    pub compute: String,
    pub storage: String,
    pub storage_upload: String,
    pub resource_manager: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            compute: "https://compute.googleapis.com/compute/v1".to_string(),
            storage: "https://storage.googleapis.com/storage/v1".to_string(),
            storage_upload: "https://storage.googleapis.com/upload/storage/v1".to_string(),
            resource_manager: "https://cloudresourcemanager.googleapis.com/v1".to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Every API rooted under one base URL (mock servers)
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            compute: format!("{}/compute/v1", base),
            storage: format!("{}/storage/v1", base),
            storage_upload: format!("{}/upload/storage/v1", base),
            resource_manager: format!("{}/v1", base),
        }
    }
}

/// Main GCP client
///
/// Not bound to a project: every call names the project it targets, so one
/// client is shared by all per-project workers.
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub endpoints: ApiEndpoints,
}

impl GcpClient {
    /// Create a new GCP client
    pub fn new(credentials: GcpCredentials) -> Result<Self, ApiError> {
        Self::with_endpoints(credentials, ApiEndpoints::default())
    }

    pub fn with_endpoints(
        credentials: GcpCredentials,
        endpoints: ApiEndpoints,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            credentials,
            http: GcpHttpClient::new()?,
            endpoints,
        })
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        let token = self.credentials.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Make a POST request to a GCP API
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let token = self.credentials.get_token().await?;
        self.http.post(url, &token, body).await
    }

    /// Upload raw bytes to a GCP media endpoint
    pub async fn post_bytes(
        &self,
        url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Value, ApiError> {
        let token = self.credentials.get_token().await?;
        self.http.post_bytes(url, &token, content_type, bytes).await
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build Compute Engine API URL for a project
    pub fn compute_url(&self, project: &str, path: &str) -> String {
        format!("{}/projects/{}/{}", self.endpoints.compute, project, path)
    }

    /// Build Cloud Storage API URL
    pub fn storage_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.storage, path)
    }

    /// Build Resource Manager API URL
    pub fn resourcemanager_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoints.resource_manager, path)
    }

    /// Full URL (query included) for one page of a listing request
    pub fn list_url(&self, request: &ListRequest, page_token: Option<&str>) -> Result<String, ApiError> {
        let base = match request.compute_path() {
            Some(path) => self.compute_url(request.project(), &path),
            None => self.storage_url("b"),
        };

        let mut url = Url::parse(&base)
            .map_err(|e| ApiError::Transient(format!("invalid URL {}: {}", base, e)))?;
        {
            let mut query = url.query_pairs_mut();
            if matches!(request, ListRequest::Buckets { .. }) {
                query.append_pair("project", request.project());
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        // query_pairs_mut leaves a dangling '?' when nothing was appended
        let mut url = url.to_string();
        if url.ends_with('?') {
            url.pop();
        }
        Ok(url)
    }
}

#[async_trait]
impl ListingService for GcpClient {
    async fn list_page(
        &self,
        request: &ListRequest,
        page_token: Option<&str>,
    ) -> Result<Page, ApiError> {
        let url = self.list_url(request, page_token)?;
        let response = self.get(&url).await?;

        if request.is_aggregated() {
            Ok(Page::from_aggregated_response(&response))
        } else {
            Ok(Page::from_response(&response))
        }
    }
}

/// Format a GCP API error for a one-line log message
pub fn format_gcp_error(error: &ApiError) -> String {
    match error {
        ApiError::PermissionDenied { status: 401, .. } => {
            "Authentication failed. Run 'gcloud auth application-default login'.".to_string()
        }
        ApiError::PermissionDenied { message, .. } => {
            format!("Permission denied: {}", message)
        }
        ApiError::NotFound(message) => format!("Resource not found: {}", message),
        other => other.to_string(),
    }
}
