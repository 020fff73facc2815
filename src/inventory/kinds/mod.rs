//! One enumerator per resource kind
//!
//! Each kind has a typed provider record (what the API returns) and a typed
//! row record whose `From` impl is the only place column order is decided.

pub mod addresses;
pub mod buckets;
pub mod compute;
pub mod firewalls;
pub mod peerings;
pub mod routes;
pub mod subnetworks;

use super::collector::Enumerator;
use super::kind::ResourceKind;
use std::sync::Arc;

/// The enumerator that collects `kind`
pub fn enumerator(kind: ResourceKind) -> Arc<dyn Enumerator> {
    match kind {
        ResourceKind::Instances => Arc::new(compute::Instances),
        ResourceKind::Subnetworks => Arc::new(subnetworks::Subnetworks),
        ResourceKind::Addresses => Arc::new(addresses::Addresses),
        ResourceKind::Routes => Arc::new(routes::Routes),
        ResourceKind::Peerings => Arc::new(peerings::Peerings),
        ResourceKind::Firewalls => Arc::new(firewalls::Firewalls),
        ResourceKind::Buckets => Arc::new(buckets::Buckets),
    }
}

/// GCP encodes int64 fields as JSON strings and int32 fields as numbers;
/// accept either.
pub(crate) fn int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Disk {
        #[serde(default, deserialize_with = "int64")]
        size: i64,
    }

    #[test]
    fn test_int64_accepts_string_and_number() {
        let s: Disk = serde_json::from_str(r#"{"size": "2048"}"#).unwrap();
        assert_eq!(s.size, 2048);
        let s: Disk = serde_json::from_str(r#"{"size": 10}"#).unwrap();
        assert_eq!(s.size, 10);
        let s: Disk = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(s.size, 0);
        assert!(serde_json::from_str::<Disk>(r#"{"size": "ten"}"#).is_err());
    }

    #[test]
    fn test_every_kind_has_an_enumerator() {
        for kind in ResourceKind::ALL {
            assert_eq!(enumerator(kind).kind(), kind);
        }
    }
}
