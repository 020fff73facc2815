//! Cloud Storage buckets, one row per bucket

use crate::error::ApiError;
use crate::gcp::projects::Project;
use crate::inventory::collector::Enumerator;
use crate::inventory::kind::{ResourceKind, ScopeQualifier, ScopeSet};
use crate::inventory::table::Row;
use crate::resource::{fetch_all_as, ListRequest, ListingService};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const HEADER: &[&str] = &[
    "Project",
    "Name",
    "Location",
    "Storage Class",
    "Creation Timestamp",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bucket {
    pub name: String,
    pub location: String,
    pub storage_class: String,
    pub time_created: String,
}

/// RFC 3339 → `YYYY-MM-DD HH:MM:SS UTC`; anything else is kept as-is
fn format_created(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct BucketRow {
    pub project: String,
    pub name: String,
    pub location: String,
    pub storage_class: String,
    pub created: String,
}

impl BucketRow {
    pub fn new(project: &Project, bucket: Bucket) -> Self {
        Self {
            project: project.display_name.clone(),
            created: format_created(&bucket.time_created),
            name: bucket.name,
            location: bucket.location,
            storage_class: bucket.storage_class,
        }
    }
}

impl From<BucketRow> for Row {
    fn from(r: BucketRow) -> Self {
        vec![r.project, r.name, r.location, r.storage_class, r.created]
    }
}

pub struct Buckets;

#[async_trait]
impl Enumerator for Buckets {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Buckets
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
        let request = ListRequest::Buckets {
            project: project.id.clone(),
        };
        let buckets: Vec<Bucket> = fetch_all_as(service, &request).await?;

        Ok(buckets
            .into_iter()
            .map(|b| BucketRow::new(project, b).into())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_created() {
        assert_eq!(format_created("2023-04-05T06:07:08.123Z"), "2023-04-05 06:07:08 UTC");
        assert_eq!(format_created("2023-04-05T08:07:08+02:00"), "2023-04-05 06:07:08 UTC");
        assert_eq!(format_created("yesterday"), "yesterday");
    }

    #[test]
    fn test_bucket_row() {
        let bucket: Bucket = serde_json::from_value(json!({
            "name": "acme-logs",
            "location": "EU",
            "storageClass": "NEARLINE",
            "timeCreated": "2023-04-05T06:07:08.123Z"
        }))
        .unwrap();

        let row: Row = BucketRow::new(&Project::new("acme", "Acme"), bucket).into();
        assert_eq!(row, vec!["Acme", "acme-logs", "EU", "NEARLINE", "2023-04-05 06:07:08 UTC"]);
    }
}
