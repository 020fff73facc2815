//! Listing requests
//!
//! One variant per provider listing call the collector issues. A request is
//! fully qualified: it names the project and, where the API is scoped, the
//! zone or region.

use std::fmt;

/// A single paginated listing call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListRequest {
    /// `compute.instances.list` in one zone
    Instances { project: String, zone: String },
    /// `compute.machineTypes.list` in one zone
    MachineTypes { project: String, zone: String },
    /// `compute.subnetworks.list` in one region
    Subnetworks { project: String, region: String },
    /// `compute.addresses.aggregatedList` across all regions
    AggregatedAddresses { project: String },
    /// `compute.globalAddresses.list`
    GlobalAddresses { project: String },
    Routes { project: String },
    Firewalls { project: String },
    Networks { project: String },
    /// `storage.buckets.list`
    Buckets { project: String },
}

impl ListRequest {
    pub fn project(&self) -> &str {
        match self {
            Self::Instances { project, .. }
            | Self::MachineTypes { project, .. }
            | Self::Subnetworks { project, .. }
            | Self::AggregatedAddresses { project }
            | Self::GlobalAddresses { project }
            | Self::Routes { project }
            | Self::Firewalls { project }
            | Self::Networks { project }
            | Self::Buckets { project } => project,
        }
    }

    /// Aggregated responses key their items by scope and need flattening
    pub fn is_aggregated(&self) -> bool {
        matches!(self, Self::AggregatedAddresses { .. })
    }

    /// Path of the collection under the Compute API for this project, or
    /// `None` for non-Compute requests
    pub fn compute_path(&self) -> Option<String> {
        let path = match self {
            Self::Instances { zone, .. } => format!("zones/{}/instances", zone),
            Self::MachineTypes { zone, .. } => format!("zones/{}/machineTypes", zone),
            Self::Subnetworks { region, .. } => format!("regions/{}/subnetworks", region),
            Self::AggregatedAddresses { .. } => "aggregated/addresses".to_string(),
            Self::GlobalAddresses { .. } => "global/addresses".to_string(),
            Self::Routes { .. } => "global/routes".to_string(),
            Self::Firewalls { .. } => "global/firewalls".to_string(),
            Self::Networks { .. } => "global/networks".to_string(),
            Self::Buckets { .. } => return None,
        };
        Some(path)
    }
}

impl fmt::Display for ListRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.compute_path() {
            Some(path) => write!(f, "compute:{}/{}", self.project(), path),
            None => write!(f, "storage:{}/buckets", self.project()),
        }
    }
}
