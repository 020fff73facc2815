//! IP addresses
//!
//! Three independent listings per project, concatenated in this order:
//! internal IPs of instances in each configured zone, the aggregated
//! reserved-address listing, and global addresses.

use super::compute::{list_instances, Instance};
use crate::error::ApiError;
use crate::gcp::projects::Project;
use crate::inventory::collector::Enumerator;
use crate::inventory::kind::{ResourceKind, ScopeQualifier, ScopeSet};
use crate::inventory::normalize::{normalize_ref, normalize_refs};
use crate::inventory::table::Row;
use crate::resource::{fetch_all_as, ListRequest, ListingService};
use async_trait::async_trait;
use serde::Deserialize;

pub const HEADER: &[&str] = &[
    "Project",
    "Region/Zone",
    "Name",
    "Address",
    "Network",
    "Subnetwork",
    "Address Type",
    "Used By",
    "Creation Timestamp",
];

const GLOBAL: &str = "global";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub name: String,
    pub address: String,
    pub region: String,
    pub network: String,
    pub subnetwork: String,
    pub address_type: String,
    pub users: Vec<String>,
    pub creation_timestamp: String,
}

pub struct AddressRow {
    pub project: String,
    pub location: String,
    pub name: String,
    pub address: String,
    pub network: String,
    pub subnetwork: String,
    pub address_type: String,
    pub used_by: String,
    pub created: String,
}

impl AddressRow {
    /// Reserved address; `location` overrides the record's own region
    pub fn reserved(project: &Project, address: Address, location: Option<&str>) -> Self {
        let location = match location {
            Some(l) => l.to_string(),
            None if address.region.is_empty() => GLOBAL.to_string(),
            None => normalize_ref(&address.region).to_string(),
        };

        Self {
            project: project.display_name.clone(),
            location,
            used_by: normalize_refs(&address.users, ","),
            network: normalize_ref(&address.network).to_string(),
            subnetwork: normalize_ref(&address.subnetwork).to_string(),
            name: address.name,
            address: address.address,
            address_type: address.address_type,
            created: address.creation_timestamp,
        }
    }

    /// One row per network interface of an instance
    pub fn internal(project: &Project, zone: &str, instance: &Instance) -> Vec<Self> {
        instance
            .network_interfaces
            .iter()
            .map(|nic| Self {
                project: project.display_name.clone(),
                location: normalize_ref(zone).to_string(),
                name: nic.name.clone(),
                address: nic.network_ip.clone(),
                network: normalize_ref(&nic.network).to_string(),
                subnetwork: normalize_ref(&nic.subnetwork).to_string(),
                address_type: "INTERNAL".to_string(),
                used_by: instance.name.clone(),
                created: instance.creation_timestamp.clone(),
            })
            .collect()
    }
}

impl From<AddressRow> for Row {
    fn from(r: AddressRow) -> Self {
        vec![
            r.project,
            r.location,
            r.name,
            r.address,
            r.network,
            r.subnetwork,
            r.address_type,
            r.used_by,
            r.created,
        ]
    }
}

pub struct Addresses;

#[async_trait]
impl Enumerator for Addresses {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Addresses
    }

    fn plan(&self, scopes: &ScopeSet) -> Vec<ScopeQualifier> {
        scopes
            .zone_scopes()
            .chain([ScopeQualifier::Aggregated, ScopeQualifier::Global])
            .collect()
    }

    async fn enumerate(
        &self,
        service: &dyn ListingService,
        project: &Project,
        scope: &ScopeQualifier,
    ) -> Result<Vec<Row>, ApiError> {
        let rows: Vec<AddressRow> = match scope {
            ScopeQualifier::Zone(zone) => list_instances(service, project, zone)
                .await?
                .iter()
                .flat_map(|instance| AddressRow::internal(project, zone, instance))
                .collect(),
            ScopeQualifier::Aggregated => {
                let request = ListRequest::AggregatedAddresses {
                    project: project.id.clone(),
                };
                fetch_all_as::<Address>(service, &request)
                    .await?
                    .into_iter()
                    .map(|a| AddressRow::reserved(project, a, None))
                    .collect()
            }
            ScopeQualifier::Global => {
                let request = ListRequest::GlobalAddresses {
                    project: project.id.clone(),
                };
                fetch_all_as::<Address>(service, &request)
                    .await?
                    .into_iter()
                    .map(|a| AddressRow::reserved(project, a, Some(GLOBAL)))
                    .collect()
            }
            ScopeQualifier::Region(_) => Vec::new(),
        };

        Ok(rows.into_iter().map(Row::from).collect())
    }
}
