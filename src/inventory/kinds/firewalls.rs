//! Firewall rules, one row per rule

use super::int64;
use crate::error::ApiError;
use crate::gcp::projects::Project;
use crate::inventory::collector::Enumerator;
use crate::inventory::kind::{ResourceKind, ScopeQualifier, ScopeSet};
use crate::inventory::normalize::normalize_ref;
use crate::inventory::table::Row;
use crate::resource::{fetch_all_as, ListRequest, ListingService};
use async_trait::async_trait;
use serde::Deserialize;

pub const HEADER: &[&str] = &[
    "Project",
    "Name",
    "Network",
    "Priority",
    "Source Ranges",
    "Allowed",
    "Denied",
    "Creation Timestamp",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Firewall {
    pub name: String,
    pub network: String,
    #[serde(deserialize_with = "int64")]
    pub priority: i64,
    pub source_ranges: Vec<String>,
    pub allowed: Vec<ProtocolPorts>,
    pub denied: Vec<ProtocolPorts>,
    pub creation_timestamp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProtocolPorts {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub ports: Vec<String>,
}

/// `tcp:22,80` per rule, rules joined with `,`
fn rules_to_string(rules: &[ProtocolPorts]) -> String {
    rules
        .iter()
        .map(|r| format!("{}:{}", r.ip_protocol, r.ports.join(",")))
        .collect::<Vec<_>>()
        .join(",")
}

pub struct FirewallRow {
    pub project: String,
    pub name: String,
    pub network: String,
    pub priority: String,
    pub source_ranges: String,
    pub allowed: String,
    pub denied: String,
    pub created: String,
}

impl FirewallRow {
    pub fn new(project: &Project, fw: Firewall) -> Self {
        Self {
            project: project.display_name.clone(),
            network: normalize_ref(&fw.network).to_string(),
            priority: fw.priority.to_string(),
            source_ranges: fw.source_ranges.join(","),
            allowed: rules_to_string(&fw.allowed),
            denied: rules_to_string(&fw.denied),
            name: fw.name,
            created: fw.creation_timestamp,
        }
    }
}

impl From<FirewallRow> for Row {
    fn from(r: FirewallRow) -> Self {
        vec![
            r.project,
            r.name,
            r.network,
            r.priority,
            r.source_ranges,
            r.allowed,
            r.denied,
            r.created,
        ]
    }
}

pub struct Firewalls;

#[async_trait]
impl Enumerator for Firewalls {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Firewalls
    }

    fn plan(&self, _scopes: &ScopeSet) -> Vec<ScopeQualifier> {
        vec![ScopeQualifier::Global]
    }

    async fn enumerate(
        &self,
        service: &dyn ListingService,
        project: &Project,
        _scope: &ScopeQualifier,
    ) -> Result<Vec<Row>, ApiError> {
        let request = ListRequest::Firewalls {
            project: project.id.clone(),
        };
        let firewalls: Vec<Firewall> = fetch_all_as(service, &request).await?;

        Ok(firewalls
            .into_iter()
            .map(|fw| FirewallRow::new(project, fw).into())
            .collect())
    }
}
