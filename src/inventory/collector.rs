//! Collection Coordinator
//!
//! Fans one resource kind out across every project (one task per project),
//! waits for all of them, and merges each project's buffer into a single
//! table. Inside a project, scopes are visited one after another so the
//! number of in-flight requests stays bounded by the number of projects.

use super::kind::{ResourceKind, ScopeQualifier, ScopeSet};
use super::kinds;
use super::table::{InventoryTable, Row, TableAccumulator};
use crate::error::ApiError;
use crate::gcp::client::format_gcp_error;
use crate::gcp::projects::Project;
use crate::resource::ListingService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Lists and denormalizes one resource kind
#[async_trait]
pub trait Enumerator: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Listing passes for one project, in visiting order
    fn plan(&self, scopes: &ScopeSet) -> Vec<ScopeQualifier>;

    /// Rows for one (project, scope) pass, in provider order
    async fn enumerate(
        &self,
        service: &dyn ListingService,
        project: &Project,
        scope: &ScopeQualifier,
    ) -> Result<Vec<Row>, ApiError>;
}

/// Collects inventory tables against one listing service
#[derive(Clone)]
pub struct Collector {
    service: Arc<dyn ListingService>,
}

impl Collector {
    pub fn new(service: Arc<dyn ListingService>) -> Self {
        Self { service }
    }

    /// Collect one resource kind across `projects`
    pub async fn collect(
        &self,
        kind: ResourceKind,
        projects: &[Project],
        scopes: &ScopeSet,
    ) -> InventoryTable {
        self.collect_with(kinds::enumerator(kind), projects, scopes)
            .await
    }

    /// Collect with an explicit enumerator
    ///
    /// Never fails: a project whose listings fail contributes fewer (or no)
    /// rows. Returns only after every project task has finished.
    pub async fn collect_with(
        &self,
        enumerator: Arc<dyn Enumerator>,
        projects: &[Project],
        scopes: &ScopeSet,
    ) -> InventoryTable {
        let kind = enumerator.kind();
        let plan: Arc<[ScopeQualifier]> = enumerator.plan(scopes).into();
        let accumulator = Arc::new(TableAccumulator::new(kind.header()));

        tracing::info!("Getting {} inventory for {} projects", kind, projects.len());

        let mut workers = JoinSet::new();
        for project in projects {
            let span = tracing::info_span!("project", project = %project.id, kind = %kind);
            let service = Arc::clone(&self.service);
            let enumerator = Arc::clone(&enumerator);
            let plan = Arc::clone(&plan);
            let accumulator = Arc::clone(&accumulator);
            let project = project.clone();

            workers.spawn(
                async move {
                    let rows = run_project(service.as_ref(), enumerator.as_ref(), &project, &plan).await;
                    tracing::debug!("Done with {} rows", rows.len());
                    accumulator.merge(&project, rows);
                }
                .instrument(span),
            );
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(kind = %kind, "Project worker aborted: {}", e);
            }
        }

        // Joined and panicked workers have both dropped their handle, so
        // the snapshot arm only runs if a task outlives the join loop
        let table = match Arc::try_unwrap(accumulator) {
            Ok(accumulator) => accumulator.into_table(),
            Err(shared) => shared.snapshot(),
        };

        tracing::info!("Done getting {} inventory: {} rows", kind, table.len());
        table
    }
}

/// Per-project worker: visit each scope in order, isolating failures
async fn run_project(
    service: &dyn ListingService,
    enumerator: &dyn Enumerator,
    project: &Project,
    plan: &[ScopeQualifier],
) -> Vec<Row> {
    let mut rows = Vec::new();

    for scope in plan {
        match enumerator.enumerate(service, project, scope).await {
            Ok(scoped) => {
                tracing::debug!(scope = %scope, "Listed {} rows", scoped.len());
                rows.extend(scoped);
            }
            Err(e) => {
                tracing::warn!(
                    scope = %scope,
                    error = %e,
                    "Failed to get {} inventory for project {} in {}: {}",
                    enumerator.kind(),
                    project.display_name,
                    scope,
                    format_gcp_error(&e)
                );
            }
        }
    }

    rows
}
