//! Error taxonomy
//!
//! Provider calls fail with [`ApiError`]; those failures are always scoped to a
//! single (project, scope, kind) tuple and never abort a run. Only
//! [`InventoryError`] unwinds past the collector.

use thiserror::Error;

/// Failure of a single provider API call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("permission denied ({status}): {message}")]
    PermissionDenied { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::PermissionDenied { status, message },
            404 => Self::NotFound(message),
            _ => Self::Transient(format!("HTTP {}: {}", status, message)),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transient(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Configuration validation failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no zones configured (set ZONES or --zones)")]
    MissingZones,

    #[error("no regions configured (set REGIONS or --regions)")]
    MissingRegions,

    #[error("no export destination: set --output-dir, or both EXPORT_PROJECT_ID and EXPORT_BUCKET_NAME")]
    MissingDestination,

    #[error("failed to read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Errors that abort a whole inventory run
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("project directory unavailable: {0}")]
    Directory(#[source] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(403, "denied"),
            ApiError::PermissionDenied { status: 403, .. }
        ));
        assert!(matches!(
            ApiError::from_status(401, "expired"),
            ApiError::PermissionDenied { status: 401, .. }
        ));
        assert_eq!(
            ApiError::from_status(404, "zone"),
            ApiError::NotFound("zone".to_string())
        );
        assert!(matches!(
            ApiError::from_status(503, "busy"),
            ApiError::Transient(_)
        ));
    }
}
