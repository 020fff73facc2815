//! Lookup Cache
//!
//! Per-(project, zone) side tables used to denormalize rows. A cache is built
//! right before the listing that needs it and dropped with it; it is never
//! shared across projects or zones.

use crate::resource::{fetch_all_as, ListRequest, ListingService};
use serde::Deserialize;
use std::collections::HashMap;

/// Attribute name for a machine type's vCPU count
pub const CPU: &str = "cpu";
/// Attribute name for a machine type's memory in MB
pub const MEMORY_MB: &str = "memory_mb";

/// One resolvable key and its attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub key: String,
    pub attributes: HashMap<String, String>,
}

/// Key → attributes side table
///
/// Misses never fail: an absent key or attribute reads as an empty string.
#[derive(Debug, Clone, Default)]
pub struct LookupCache {
    entries: HashMap<String, LookupEntry>,
}

impl LookupCache {
    pub fn from_entries(entries: impl IntoIterator<Item = LookupEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.key.clone(), e)).collect(),
        }
    }

    pub fn get(&self, key: &str, attribute: &str) -> &str {
        self.entries
            .get(key)
            .and_then(|entry| entry.attributes.get(attribute))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MachineType {
    name: String,
    guest_cpus: i64,
    memory_mb: i64,
}

impl From<MachineType> for LookupEntry {
    fn from(mt: MachineType) -> Self {
        let attributes = HashMap::from([
            (CPU.to_string(), mt.guest_cpus.to_string()),
            (MEMORY_MB.to_string(), mt.memory_mb.to_string()),
        ]);
        Self {
            key: mt.name,
            attributes,
        }
    }
}

/// Machine-type catalog of one zone
///
/// A failed listing yields an empty cache; rows then carry empty CPU and
/// memory cells instead of being dropped.
pub async fn machine_types(service: &dyn ListingService, project: &str, zone: &str) -> LookupCache {
    let request = ListRequest::MachineTypes {
        project: project.to_string(),
        zone: zone.to_string(),
    };

    match fetch_all_as::<MachineType>(service, &request).await {
        Ok(types) => {
            let cache = LookupCache::from_entries(types.into_iter().map(LookupEntry::from));
            tracing::debug!("Loaded {} machine types for {} in {}", cache.len(), project, zone);
            cache
        }
        Err(e) => {
            tracing::debug!("No machine types for {} in {}: {}", project, zone, e);
            LookupCache::default()
        }
    }
}
