//! GCP Projects
//!
//! The project directory: every active project the caller can see.

use super::client::GcpClient;
use crate::error::ApiError;
use crate::resource::{paginate, Page};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// One tenant scope of the inventory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Project {
    pub id: String,
    pub display_name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<&Value> for Project {
    fn from(value: &Value) -> Self {
        let id = value
            .get("projectId")
            .and_then(|v| v.as_str())
            .unwrap_or("-")
            .to_string();
        let display_name = value
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());

        Self { id, display_name }
    }
}

/// Source of the projects an inventory run covers
///
/// Failure here is fatal to the run.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
}

/// Resource Manager backed directory, optionally restricted to one organization
pub struct ResourceManagerDirectory {
    client: GcpClient,
    org_id: Option<String>,
}

impl ResourceManagerDirectory {
    pub fn new(client: GcpClient, org_id: Option<String>) -> Self {
        Self { client, org_id }
    }

    fn page_url(&self, page_token: Option<&str>) -> Result<String, ApiError> {
        let base = self.client.resourcemanager_url("projects");
        let mut url = Url::parse(&base)
            .map_err(|e| ApiError::Transient(format!("invalid URL {}: {}", base, e)))?;

        if self.org_id.is_some() || page_token.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(org) = &self.org_id {
                query.append_pair("filter", &format!("parent.id:{}", org));
            }
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        Ok(url.to_string())
    }
}

#[async_trait]
impl ProjectDirectory for ResourceManagerDirectory {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        tracing::info!("Getting projects list");

        let records = paginate(|token| async move {
            let url = self.page_url(token.as_deref())?;
            let response = self.client.get(&url).await?;
            Ok(Page::from_collection(&response, "projects"))
        })
        .await?;

        let projects: Vec<Project> = records
            .iter()
            // Only include active projects
            .filter(|value| value.get("lifecycleState").and_then(|v| v.as_str()) == Some("ACTIVE"))
            .map(Project::from)
            .inspect(|project| tracing::debug!("Found project {} ({})", project.display_name, project.id))
            .collect();

        tracing::info!("Found {} projects", projects.len());
        Ok(projects)
    }
}
