//! Configuration Management
//!
//! Layered configuration: optional JSON file, then environment, then command
//! line. The result is validated once before any provider call is made.

use crate::error::ConfigError;
use crate::inventory::{ResourceKind, ScopeSet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Restrict the project directory to one organization
    #[serde(default)]
    pub org_id: Option<String>,
    /// Regions scanned for regional resources (subnetworks)
    #[serde(default)]
    pub regions: Vec<String>,
    /// Zones scanned for zonal resources (instances, internal IPs)
    #[serde(default)]
    pub zones: Vec<String>,
    /// Project owning the export bucket
    #[serde(default)]
    pub export_project_id: Option<String>,
    #[serde(default)]
    pub export_bucket_name: Option<String>,
    /// Write sheets to this directory instead of a bucket
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Where the finished inventory goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Directory(PathBuf),
    Bucket { project: String, bucket: String },
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcp-inventory").join("config.json"))
    }

    /// Load configuration from disk
    ///
    /// An explicit path must exist and parse. The default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(&path).map_err(|e| unreadable(e.to_string()))?;
        let config = serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Overlay values from any variable source; set variables win
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("ORG_ID") {
            self.org_id = Some(v.trim().to_string());
        }
        if let Some(v) = var("REGIONS") {
            self.regions = parse_list(&v);
        }
        if let Some(v) = var("ZONES") {
            self.zones = parse_list(&v);
        }
        if let Some(v) = var("EXPORT_PROJECT_ID") {
            self.export_project_id = Some(v.trim().to_string());
        }
        if let Some(v) = var("EXPORT_BUCKET_NAME") {
            self.export_bucket_name = Some(v.trim().to_string());
        }
    }

    /// Validate for a run over every resource kind
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_for(&ResourceKind::ALL)
    }

    /// Zones and regions are only required when a requested kind is listed
    /// per zone or per region
    pub fn validate_for(&self, kinds: &[ResourceKind]) -> Result<(), ConfigError> {
        if self.zones.is_empty() && kinds.iter().any(|k| k.needs_zones()) {
            return Err(ConfigError::MissingZones);
        }
        if self.regions.is_empty() && kinds.iter().any(|k| k.needs_regions()) {
            return Err(ConfigError::MissingRegions);
        }
        self.destination().map(|_| ())
    }

    /// Local directory wins over a bucket when both are configured
    pub fn destination(&self) -> Result<Destination, ConfigError> {
        if let Some(dir) = &self.output_dir {
            return Ok(Destination::Directory(dir.clone()));
        }
        match (&self.export_project_id, &self.export_bucket_name) {
            (Some(project), Some(bucket)) => Ok(Destination::Bucket {
                project: project.clone(),
                bucket: bucket.clone(),
            }),
            _ => Err(ConfigError::MissingDestination),
        }
    }

    pub fn scopes(&self) -> ScopeSet {
        ScopeSet::new(self.zones.clone(), self.regions.clone())
    }
}

/// Split a comma separated list, dropping blanks
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
