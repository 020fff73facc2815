//! Resource kinds and scope qualifiers

use super::kinds::{addresses, buckets, compute, firewalls, peerings, routes, subnetworks};
use std::fmt;
use std::str::FromStr;

/// The resource kinds the inventory knows how to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Instances,
    Subnetworks,
    Addresses,
    Routes,
    Peerings,
    Firewalls,
    Buckets,
}

impl ResourceKind {
    /// All kinds, in export order
    pub const ALL: [ResourceKind; 7] = [
        Self::Instances,
        Self::Subnetworks,
        Self::Addresses,
        Self::Routes,
        Self::Peerings,
        Self::Firewalls,
        Self::Buckets,
    ];

    /// Name of the exported sheet
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Instances => "Compute",
            Self::Subnetworks => "VPC",
            Self::Addresses => "IP Addresses",
            Self::Routes => "Routes",
            Self::Peerings => "VPC Peering",
            Self::Firewalls => "Firewall",
            Self::Buckets => "Cloud Storage",
        }
    }

    pub fn header(self) -> &'static [&'static str] {
        match self {
            Self::Instances => compute::HEADER,
            Self::Subnetworks => subnetworks::HEADER,
            Self::Addresses => addresses::HEADER,
            Self::Routes => routes::HEADER,
            Self::Peerings => peerings::HEADER,
            Self::Firewalls => firewalls::HEADER,
            Self::Buckets => buckets::HEADER,
        }
    }

    /// Listed once per configured zone
    pub fn needs_zones(self) -> bool {
        matches!(self, Self::Instances | Self::Addresses)
    }

    /// Listed once per configured region
    pub fn needs_regions(self) -> bool {
        matches!(self, Self::Subnetworks)
    }

    /// Short identifier used in logs and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instances => "instances",
            Self::Subnetworks => "subnetworks",
            Self::Addresses => "addresses",
            Self::Routes => "routes",
            Self::Peerings => "peerings",
            Self::Firewalls => "firewalls",
            Self::Buckets => "buckets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown resource kind '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Where one listing pass searches
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeQualifier {
    Zone(String),
    Region(String),
    /// Cross-region aggregated listing
    Aggregated,
    /// Project-global listing, no qualifier
    Global,
}

impl fmt::Display for ScopeQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(zone) => f.write_str(zone),
            Self::Region(region) => f.write_str(region),
            Self::Aggregated => f.write_str("aggregated"),
            Self::Global => f.write_str("global"),
        }
    }
}

/// The configured zones and regions, shared read-only by every worker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet {
    pub zones: Vec<String>,
    pub regions: Vec<String>,
}

impl ScopeSet {
    pub fn new(zones: Vec<String>, regions: Vec<String>) -> Self {
        Self { zones, regions }
    }

    pub fn zone_scopes(&self) -> impl Iterator<Item = ScopeQualifier> + '_ {
        self.zones.iter().cloned().map(ScopeQualifier::Zone)
    }

    pub fn region_scopes(&self) -> impl Iterator<Item = ScopeQualifier> + '_ {
        self.regions.iter().cloned().map(ScopeQualifier::Region)
    }
}
