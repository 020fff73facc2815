//! VPC peerings, one row per peering of every network

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
    "Peer Network",
    "State",
    "Auto Create Routes",
    "Exchange Subnet Routes",
    "Export Custom Routes",
    "Import Custom Routes",
    "Export Subnet Routes With Public IP",
    "Import Subnet Routes With Public IP",
    "Creation Timestamp",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    pub name: String,
    pub creation_timestamp: String,
    pub peerings: Vec<NetworkPeering>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPeering {
    pub name: String,
    pub network: String,
    pub state: String,
    pub state_details: String,
    pub auto_create_routes: bool,
    pub exchange_subnet_routes: bool,
    pub export_custom_routes: bool,
    pub import_custom_routes: bool,
    pub export_subnet_routes_with_public_ip: bool,
    pub import_subnet_routes_with_public_ip: bool,
}

pub struct PeeringRow {
    pub project: String,
    pub name: String,
    pub network: String,
    pub peer_network: String,
    pub state: String,
    pub auto_create_routes: bool,
    pub exchange_subnet_routes: bool,
    pub export_custom_routes: bool,
    pub import_custom_routes: bool,
    pub export_subnet_routes_with_public_ip: bool,
    pub import_subnet_routes_with_public_ip: bool,
    pub created: String,
}

impl PeeringRow {
    pub fn new(project: &Project, network: &Network, peering: &NetworkPeering) -> Self {
        // stateDetails is empty for healthy peerings
        let state = if peering.state_details.is_empty() {
            peering.state.clone()
        } else {
            peering.state_details.clone()
        };

        Self {
            project: project.display_name.clone(),
            name: peering.name.clone(),
            network: normalize_ref(&network.name).to_string(),
            peer_network: normalize_ref(&peering.network).to_string(),
            state,
            auto_create_routes: peering.auto_create_routes,
            exchange_subnet_routes: peering.exchange_subnet_routes,
            export_custom_routes: peering.export_custom_routes,
            import_custom_routes: peering.import_custom_routes,
            export_subnet_routes_with_public_ip: peering.export_subnet_routes_with_public_ip,
            import_subnet_routes_with_public_ip: peering.import_subnet_routes_with_public_ip,
            created: network.creation_timestamp.clone(),
        }
    }
}

impl From<PeeringRow> for Row {
    fn from(r: PeeringRow) -> Self {
        vec![
            r.project,
            r.name,
            r.network,
            r.peer_network,
            r.state,
            r.auto_create_routes.to_string(),
            r.exchange_subnet_routes.to_string(),
            r.export_custom_routes.to_string(),
            r.import_custom_routes.to_string(),
            r.export_subnet_routes_with_public_ip.to_string(),
            r.import_subnet_routes_with_public_ip.to_string(),
            r.created,
        ]
    }
}

pub struct Peerings;

#[async_trait]
impl Enumerator for Peerings {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Peerings
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
        let request = ListRequest::Networks {
            project: project.id.clone(),
        };
        let networks: Vec<Network> = fetch_all_as(service, &request).await?;

        Ok(networks
            .iter()
            .flat_map(|network| {
                network
                    .peerings
                    .iter()
                    .map(move |peering| Row::from(PeeringRow::new(project, network, peering)))
            })
            .collect())
    }
}
