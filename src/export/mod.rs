//! Export Orchestrator
//!
//! Collects each resource kind once, assembles the tables into named sheets
//! and hands the encoded sheets to a sink. The sink is prepared before the
//! first provider call, so an unusable destination fails the run early.
//!
//! - [`encoding`] - Sheet encoding
//! - [`sink`] - Local directory and Cloud Storage destinations

pub mod encoding;
pub mod sink;

use crate::error::InventoryError;
use crate::gcp::projects::ProjectDirectory;
use crate::inventory::{Collector, InventoryTable, ResourceKind, ScopeSet};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sink::InventorySink;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// One named table of the exported document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub table: InventoryTable,
}

impl Sheet {
    /// Object name of this sheet inside a run, e.g. `ip-addresses.csv`
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        format!("{}.csv", stem)
    }
}

/// The full inventory, one sheet per resource kind, in collection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn add_sheet(&mut self, name: impl Into<String>, table: InventoryTable) {
        self.sheets.push(Sheet {
            name: name.into(),
            table,
        });
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// `inventory-YYYY-MM-DD-HH-MM-SS`
pub fn run_name(at: DateTime<Utc>) -> String {
    format!("inventory-{}", at.format("%Y-%m-%d-%H-%M-%S"))
}

/// Discover projects and collect every requested kind
///
/// Only a directory failure is fatal; listing failures just thin out the
/// affected sheets.
pub async fn collect_workbook(
    directory: &dyn ProjectDirectory,
    collector: &Collector,
    scopes: &ScopeSet,
    kinds: &[ResourceKind],
) -> Result<Workbook, InventoryError> {
    let projects = directory
        .list_projects()
        .await
        .map_err(InventoryError::Directory)?;

    let mut workbook = Workbook::default();
    for &kind in kinds {
        let table = collector.collect(kind, &projects, scopes).await;
        if table.is_empty() {
            tracing::info!("Sheet {} has no rows", kind.sheet_name());
        }
        workbook.add_sheet(kind.sheet_name(), table);
    }

    Ok(workbook)
}

/// Encode every sheet and write it under `run_name/`
///
/// The sink must already be prepared.
pub async fn write_workbook(
    workbook: &Workbook,
    sink: &dyn InventorySink,
    run_name: &str,
) -> Result<Vec<String>, InventoryError> {
    let mut locations = Vec::with_capacity(workbook.sheets().len());
    for sheet in workbook.sheets() {
        let name = format!("{}/{}", run_name, sheet.file_name());
        let bytes = encoding::encode_csv(&sheet.table.to_rows())
            .with_context(|| format!("Failed to encode sheet {}", sheet.name))?;
        let location = sink.put(&name, CSV_CONTENT_TYPE, bytes).await?;
        tracing::info!("Wrote sheet {} to {}", sheet.name, location);
        locations.push(location);
    }

    Ok(locations)
}

/// A full run: prepare the sink, collect every kind, write every sheet
pub async fn export_inventory(
    directory: &dyn ProjectDirectory,
    collector: &Collector,
    scopes: &ScopeSet,
    kinds: &[ResourceKind],
    sink: &dyn InventorySink,
    run_name: &str,
) -> Result<Vec<String>, InventoryError> {
    sink.prepare().await?;

    let workbook = collect_workbook(directory, collector, scopes, kinds).await?;
    write_workbook(&workbook, sink, run_name).await
}
