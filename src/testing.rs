//! In-memory listing service for tests

use crate::error::ApiError;
use crate::resource::{ListRequest, ListingService, Page};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Serves canned pages per request; anything not registered lists as empty
#[derive(Default)]
pub struct FakeListing {
    pages: HashMap<ListRequest, Vec<Vec<Value>>>,
    failures: HashMap<ListRequest, ApiError>,
    failing_projects: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<ListRequest, usize>>,
}

impl FakeListing {
    pub fn with_pages(mut self, request: ListRequest, pages: Vec<Vec<Value>>) -> Self {
        self.pages.insert(request, pages);
        self
    }

    pub fn with_items(self, request: ListRequest, items: Vec<Value>) -> Self {
        self.with_pages(request, vec![items])
    }

    pub fn failing(mut self, request: ListRequest, err: ApiError) -> Self {
        self.failures.insert(request, err);
        self
    }

    /// Every request for this project fails with permission denied
    pub fn failing_project(mut self, project: &str) -> Self {
        self.failing_projects.insert(project.to_string());
        self
    }

    /// Sleep before answering any request for this project
    pub fn delayed(mut self, project: &str, delay: Duration) -> Self {
        self.delays.insert(project.to_string(), delay);
        self
    }

    pub fn calls(&self, request: &ListRequest) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(request)
            .copied()
            .unwrap_or(0)
    }

    /// Calls across every request
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ListingService for FakeListing {
    async fn list_page(
        &self,
        request: &ListRequest,
        page_token: Option<&str>,
    ) -> Result<Page, ApiError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(request.clone())
            .or_default() += 1;

        if let Some(delay) = self.delays.get(request.project()) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing_projects.contains(request.project()) {
            return Err(ApiError::PermissionDenied {
                status: 403,
                message: format!("no access to {}", request.project()),
            });
        }
        if let Some(err) = self.failures.get(request) {
            return Err(err.clone());
        }

        let Some(pages) = self.pages.get(request) else {
            return Ok(Page::default());
        };

        let index: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let items = pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());

        Ok(Page {
            items,
            next_page_token,
        })
    }
}
