//! Routes, one row per route

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
    "Dest Range",
    "Priority",
    "Next Hop IP",
    "Next Hop Network",
    "Next Hop Gateway",
    "Next Hop Peering",
    "Next Hop Ilb",
    "Creation Timestamp",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    pub name: String,
    pub network: String,
    pub dest_range: String,
    #[serde(deserialize_with = "int64")]
    pub priority: i64,
    pub next_hop_ip: String,
    pub next_hop_network: String,
    pub next_hop_gateway: String,
    pub next_hop_peering: String,
    pub next_hop_ilb: String,
    pub creation_timestamp: String,
}

pub struct RouteRow {
    pub project: String,
    pub name: String,
    pub network: String,
    pub dest_range: String,
    pub priority: String,
    pub next_hop_ip: String,
    pub next_hop_network: String,
    pub next_hop_gateway: String,
    pub next_hop_peering: String,
    pub next_hop_ilb: String,
    pub created: String,
}

impl RouteRow {
    pub fn new(project: &Project, route: Route) -> Self {
        Self {
            project: project.display_name.clone(),
            network: normalize_ref(&route.network).to_string(),
            priority: route.priority.to_string(),
            next_hop_ip: normalize_ref(&route.next_hop_ip).to_string(),
            next_hop_network: normalize_ref(&route.next_hop_network).to_string(),
            next_hop_gateway: normalize_ref(&route.next_hop_gateway).to_string(),
            next_hop_peering: normalize_ref(&route.next_hop_peering).to_string(),
            next_hop_ilb: normalize_ref(&route.next_hop_ilb).to_string(),
            name: route.name,
            dest_range: route.dest_range,
            created: route.creation_timestamp,
        }
    }
}

impl From<RouteRow> for Row {
    fn from(r: RouteRow) -> Self {
        vec![
            r.project,
            r.name,
            r.network,
            r.dest_range,
            r.priority,
            r.next_hop_ip,
            r.next_hop_network,
            r.next_hop_gateway,
            r.next_hop_peering,
            r.next_hop_ilb,
            r.created,
        ]
    }
}

pub struct Routes;

#[async_trait]
impl Enumerator for Routes {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Routes
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
        let request = ListRequest::Routes {
            project: project.id.clone(),
        };
        let routes: Vec<Route> = fetch_all_as(service, &request).await?;

        Ok(routes
            .into_iter()
            .map(|r| RouteRow::new(project, r).into())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_row_normalizes_next_hops() {
        let route: Route = serde_json::from_value(json!({
            "name": "default-route-abc",
            "network": "https://www.googleapis.com/compute/v1/projects/acme/global/networks/default",
            "destRange": "0.0.0.0/0",
            "priority": 1000,
            "nextHopGateway": "https://www.googleapis.com/compute/v1/projects/acme/global/gateways/default-internet-gateway",
            "creationTimestamp": "2020-02-02T02:02:02.000-08:00"
        }))
        .unwrap();

        let row: Row = RouteRow::new(&Project::new("acme", "Acme"), route).into();
        assert_eq!(
            row,
            vec![
                "Acme",
                "default-route-abc",
                "default",
                "0.0.0.0/0",
                "1000",
                "",
                "",
                "default-internet-gateway",
                "",
                "",
                "2020-02-02T02:02:02.000-08:00",
            ]
        );
    }

    #[test]
    fn test_project_global_plan() {
        let scopes = ScopeSet::new(vec!["z1".into(), "z2".into()], vec![]);
        assert_eq!(Routes.plan(&scopes), vec![ScopeQualifier::Global]);
    }
}
