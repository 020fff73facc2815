//! Resource Fetcher
//!
//! The page-level listing seam and the pagination loop on top of it.

use super::request::ListRequest;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

/// One page of a listing response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_page_token: Option<String>,
}

impl Page {
    /// Build a page from a raw list response (`items` + `nextPageToken`)
    pub fn from_response(response: &Value) -> Self {
        Self::from_collection(response, "items")
    }

    /// Build a page from a list response whose records sit under `field`
    pub fn from_collection(response: &Value, field: &str) -> Self {
        let items = response
            .get(field)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        Self {
            items,
            next_page_token: next_page_token(response),
        }
    }

    /// Build a page from an aggregated response, where `items` is a map of
    /// scope name to `{ "<collection>": [...] }` or `{ "warning": {...} }`
    pub fn from_aggregated_response(response: &Value) -> Self {
        let mut items = Vec::new();

        if let Some(scopes) = response.get("items").and_then(|v| v.as_object()) {
            for (_scope, scoped) in scopes {
                let Some(obj) = scoped.as_object() else {
                    continue;
                };
                for (key, value) in obj {
                    if key == "warning" {
                        continue;
                    }
                    if let Some(arr) = value.as_array() {
                        items.extend(arr.iter().cloned());
                    }
                }
            }
        }

        Self {
            items,
            next_page_token: next_page_token(response),
        }
    }
}

fn next_page_token(response: &Value) -> Option<String> {
    response
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Resource Listing Service
///
/// Returns one page per call; callers drive pagination through
/// [`fetch_all`].
#[async_trait]
pub trait ListingService: Send + Sync {
    async fn list_page(
        &self,
        request: &ListRequest,
        page_token: Option<&str>,
    ) -> Result<Page, ApiError>;
}

/// Drive a page-token loop until the provider stops returning a token
///
/// `fetch_page` receives the token of the page to fetch (`None` first).
pub async fn paginate<F, Fut>(mut fetch_page: F) -> Result<Vec<Value>, ApiError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page, ApiError>>,
{
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = fetch_page(page_token.take()).await?;
        all_items.extend(page.items);

        match page.next_page_token {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    Ok(all_items)
}

/// Fetch all records for a request (auto-paginate)
///
/// Records come back in provider order: page order, then in-page order.
/// An empty first page is a valid, empty result.
pub async fn fetch_all(
    service: &dyn ListingService,
    request: &ListRequest,
) -> Result<Vec<Value>, ApiError> {
    let items = paginate(|token| async move { service.list_page(request, token.as_deref()).await }).await?;

    tracing::trace!("{}: {} records", request, items.len());
    Ok(items)
}

/// Fetch all records and decode them into typed provider records
///
/// One undecodable record fails the whole request; the error names it.
pub async fn fetch_all_as<T: DeserializeOwned>(
    service: &dyn ListingService,
    request: &ListRequest,
) -> Result<Vec<T>, ApiError> {
    fetch_all(service, request)
        .await?
        .into_iter()
        .map(|item| {
            let name = item
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("<unnamed>")
                .to_string();
            serde_json::from_value(item).map_err(|e| {
                tracing::warn!("{}: cannot decode record {}: {}", request, name, e);
                ApiError::Decode(format!("record {}: {}", name, e))
            })
        })
        .collect()
}
