//! GCP Authentication
//!
//! Handles authentication using Application Default Credentials (ADC), or a
//! pre-issued bearer token handed in on the command line.

use crate::error::ApiError;
use gcp_auth::TokenProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default scopes for GCP API access
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Environment variable holding a pre-issued access token
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
enum TokenSource {
    Provider(Arc<dyn TokenProvider>),
    Static(String),
}

/// GCP credentials holder with token caching
///
/// Cheap to clone; every per-project worker shares the same cache.
#[derive(Clone)]
pub struct GcpCredentials {
    source: TokenSource,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl GcpCredentials {
    /// Create credentials from Application Default Credentials
    pub async fn new() -> Result<Self, ApiError> {
        let provider = gcp_auth::provider().await.map_err(|e| {
            ApiError::Auth(format!(
                "{}. Run 'gcloud auth application-default login'",
                e
            ))
        })?;

        Ok(Self {
            source: TokenSource::Provider(provider),
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Use a fixed bearer token for every request
    pub fn from_static_token(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Static token from the environment if set, otherwise ADC
    pub async fn from_env_or_default() -> Result<Self, ApiError> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                tracing::debug!("Using access token from {}", ACCESS_TOKEN_ENV);
                Ok(Self::from_static_token(token.trim()))
            }
            _ => Self::new().await,
        }
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String, ApiError> {
        let provider = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Provider(provider) => provider,
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = provider
            .token(DEFAULT_SCOPES)
            .await
            .map_err(|e| ApiError::Auth(format!("failed to get access token: {}", e)))?;

        let token_str = token.as_str().to_string();
        let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token_str.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            (DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_is_returned_verbatim() {
        let creds = GcpCredentials::from_static_token("abc123");
        assert_eq!(creds.get_token().await.unwrap(), "abc123");
        // cache is untouched for static tokens
        assert!(creds.token_cache.read().await.is_none());
    }

    #[test]
    fn test_cached_token_expiry() {
        let fresh = CachedToken {
            token: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(10),
        };
        assert!(fresh.is_valid());

        let stale = CachedToken {
            token: "t".into(),
            expires_at: Instant::now() - Duration::from_secs(1),
        };
        assert!(!stale.is_valid());
    }
}
