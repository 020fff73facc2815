//! Compute instances, one row per VM

use super::int64;
use crate::error::ApiError;
use crate::gcp::projects::Project;
use crate::inventory::collector::Enumerator;
use crate::inventory::kind::{ResourceKind, ScopeQualifier, ScopeSet};
use crate::inventory::lookup::{self, LookupCache, CPU, MEMORY_MB};
use crate::inventory::normalize::normalize_ref;
use crate::inventory::table::Row;
use crate::resource::{fetch_all_as, ListRequest, ListingService};
use async_trait::async_trait;
use serde::Deserialize;

pub const HEADER: &[&str] = &[
    "Project",
    "Zone",
    "Name",
    "Status",
    "Machine Type",
    "CPU",
    "Memory (MB)",
    "IP Address",
    "Disks (GB)",
    "Creation Time",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub name: String,
    pub status: String,
    pub machine_type: String,
    pub network_interfaces: Vec<NetworkInterface>,
    pub disks: Vec<AttachedDisk>,
    pub creation_timestamp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    pub name: String,
    pub network: String,
    pub subnetwork: String,
    #[serde(rename = "networkIP")]
    pub network_ip: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedDisk {
    #[serde(deserialize_with = "int64")]
    pub disk_size_gb: i64,
}

/// Every instance in one zone, in provider order
pub(crate) async fn list_instances(
    service: &dyn ListingService,
    project: &Project,
    zone: &str,
) -> Result<Vec<Instance>, ApiError> {
    let request = ListRequest::Instances {
        project: project.id.clone(),
        zone: zone.to_string(),
    };
    fetch_all_as(service, &request).await
}

pub struct InstanceRow {
    pub project: String,
    pub zone: String,
    pub name: String,
    pub status: String,
    pub machine_type: String,
    pub cpu: String,
    pub memory_mb: String,
    pub ip_addresses: String,
    pub disks: String,
    pub created: String,
}

impl InstanceRow {
    pub fn new(project: &Project, zone: &str, instance: Instance, machine_types: &LookupCache) -> Self {
        let machine_type = normalize_ref(&instance.machine_type).to_string();

        let ip_addresses = instance
            .network_interfaces
            .iter()
            .map(|nic| nic.network_ip.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let disks = instance
            .disks
            .iter()
            .map(|disk| format!("{}GB", disk.disk_size_gb))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            project: project.display_name.clone(),
            zone: zone.to_string(),
            name: instance.name,
            status: instance.status,
            cpu: machine_types.get(&machine_type, CPU).to_string(),
            memory_mb: machine_types.get(&machine_type, MEMORY_MB).to_string(),
            machine_type,
            ip_addresses,
            disks,
            created: instance.creation_timestamp,
        }
    }
}

impl From<InstanceRow> for Row {
    fn from(r: InstanceRow) -> Self {
        vec![
            r.project,
            r.zone,
            r.name,
            r.status,
            r.machine_type,
            r.cpu,
            r.memory_mb,
            r.ip_addresses,
            r.disks,
            r.created,
        ]
    }
}

/// Instances per zone, with CPU and memory resolved from that zone's
/// machine-type catalog
pub struct Instances;

#[async_trait]
impl Enumerator for Instances {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Instances
    }

    fn plan(&self, scopes: &ScopeSet) -> Vec<ScopeQualifier> {
        scopes.zone_scopes().collect()
    }

    async fn enumerate(
        &self,
        service: &dyn ListingService,
        project: &Project,
        scope: &ScopeQualifier,
    ) -> Result<Vec<Row>, ApiError> {
        let ScopeQualifier::Zone(zone) = scope else {
            return Ok(Vec::new());
        };

        // Rebuilt for every zone: catalogs differ between zones
        let machine_types = lookup::machine_types(service, &project.id, zone).await;
        let instances = list_instances(service, project, zone).await?;

        Ok(instances
            .into_iter()
            .map(|instance| InstanceRow::new(project, zone, instance, &machine_types).into())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::lookup::LookupEntry;
    use std::collections::HashMap;

    fn instance() -> Instance {
        serde_json::from_value(serde_json::json!({
            "name": "web-1",
            "status": "RUNNING",
            "machineType": "https://www.googleapis.com/compute/v1/projects/acme/zones/us-central1-a/machineTypes/e2-standard-4",
            "networkInterfaces": [
                {"name": "nic0", "networkIP": "10.128.0.5", "network": "global/networks/default"},
                {"name": "nic1", "networkIP": "10.10.0.7"}
            ],
            "disks": [{"diskSizeGb": "20"}, {"diskSizeGb": "500"}],
            "creationTimestamp": "2023-05-02T10:11:12.000-07:00"
        }))
        .unwrap()
    }

    fn cache() -> LookupCache {
        LookupCache::from_entries([LookupEntry {
            key: "e2-standard-4".into(),
            attributes: HashMap::from([
                (CPU.to_string(), "4".to_string()),
                (MEMORY_MB.to_string(), "16384".to_string()),
            ]),
        }])
    }

    #[test]
    fn test_instance_row() {
        let project = Project::new("acme", "Acme");
        let row: Row = InstanceRow::new(&project, "us-central1-a", instance(), &cache()).into();

        assert_eq!(row.len(), HEADER.len());
        assert_eq!(
            row,
            vec![
                "Acme",
                "us-central1-a",
                "web-1",
                "RUNNING",
                "e2-standard-4",
                "4",
                "16384",
                "10.128.0.5, 10.10.0.7",
                "20GB, 500GB",
                "2023-05-02T10:11:12.000-07:00",
            ]
        );
    }

    #[test]
    fn test_instance_row_cache_miss_keeps_row() {
        let project = Project::new("acme", "Acme");
        let row: Row = InstanceRow::new(&project, "z", instance(), &LookupCache::default()).into();
        assert_eq!(row.len(), HEADER.len());
        assert_eq!(row[5], "");
        assert_eq!(row[6], "");
    }

    #[test]
    fn test_instance_without_nics_or_disks() {
        let bare: Instance = serde_json::from_str(r#"{"name": "bare"}"#).unwrap();
        let row: Row = InstanceRow::new(&Project::new("p", "P"), "z", bare, &LookupCache::default()).into();
        assert_eq!(row.len(), HEADER.len());
        assert_eq!(row[7], "");
        assert_eq!(row[8], "");
    }
}
