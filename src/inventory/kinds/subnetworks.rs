//! VPC subnetworks, one row per subnetwork per region

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
    "Region",
    "Name",
    "Subnetwork",
    "CIDR",
    "Gateway Address",
    "Creation Timestamp",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subnetwork {
    pub name: String,
    pub network: String,
    pub ip_cidr_range: String,
    pub gateway_address: String,
    pub creation_timestamp: String,
}

/// "Name" is the parent VPC, "Subnetwork" the subnetwork itself
pub struct SubnetworkRow {
    pub project: String,
    pub region: String,
    pub network: String,
    pub name: String,
    pub cidr: String,
    pub gateway: String,
    pub created: String,
}

impl SubnetworkRow {
    pub fn new(project: &Project, region: &str, subnet: Subnetwork) -> Self {
        Self {
            project: project.display_name.clone(),
            region: region.to_string(),
            network: normalize_ref(&subnet.network).to_string(),
            name: subnet.name,
            cidr: subnet.ip_cidr_range,
            gateway: subnet.gateway_address,
            created: subnet.creation_timestamp,
        }
    }
}

impl From<SubnetworkRow> for Row {
    fn from(r: SubnetworkRow) -> Self {
        vec![r.project, r.region, r.network, r.name, r.cidr, r.gateway, r.created]
    }
}

pub struct Subnetworks;

#[async_trait]
impl Enumerator for Subnetworks {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Subnetworks
    }

    fn plan(&self, scopes: &ScopeSet) -> Vec<ScopeQualifier> {
        scopes.region_scopes().collect()
    }

    async fn enumerate(
        &self,
        service: &dyn ListingService,
        project: &Project,
        scope: &ScopeQualifier,
    ) -> Result<Vec<Row>, ApiError> {
        let ScopeQualifier::Region(region) = scope else {
            return Ok(Vec::new());
        };

        let request = ListRequest::Subnetworks {
            project: project.id.clone(),
            region: region.clone(),
        };
        let subnets: Vec<Subnetwork> = fetch_all_as(service, &request).await?;

        Ok(subnets
            .into_iter()
            .map(|s| SubnetworkRow::new(project, region, s).into())
            .collect())
    }
}
