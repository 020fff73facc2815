//! Inventory tables and the fan-in accumulator

use crate::gcp::projects::Project;
use std::sync::{Mutex, PoisonError};

/// One table row, positionally aligned to its kind's header
pub type Row = Vec<String>;

/// The merged, header-prefixed row set for one resource kind
///
/// Rows from one project are contiguous and keep their collection order;
/// the order of project groups is the order workers finished in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTable {
    header: &'static [&'static str],
    rows: Vec<Row>,
}

impl InventoryTable {
    pub fn header_only(header: &'static [&'static str]) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        self.header
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The full table as string rows; row 0 is always the header
    pub fn to_rows(&self) -> Vec<Row> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.header.iter().map(|h| h.to_string()).collect());
        out.extend(self.rows.iter().cloned());
        out
    }

    /// Data rows belonging to one project, by display name
    pub fn rows_for<'a>(&'a self, display_name: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.first().map(String::as_str) == Some(display_name))
    }
}

/// Shared fan-in target for per-project workers
///
/// The lock is taken once per project, for one bulk append, and never across
/// a provider call.
pub struct TableAccumulator {
    header: &'static [&'static str],
    rows: Mutex<Vec<Row>>,
}

impl TableAccumulator {
    pub fn new(header: &'static [&'static str]) -> Self {
        Self {
            header,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Append one project's entire buffer in a single critical section
    pub fn merge(&self, project: &Project, buffer: Vec<Row>) {
        if buffer.is_empty() {
            return;
        }
        debug_assert!(
            buffer.iter().all(|row| row.len() == self.header.len()),
            "row width does not match header"
        );

        let count = buffer.len();
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(buffer);
        tracing::trace!("Merged {} rows from {}", count, project.id);
    }

    /// Copy of everything merged so far
    pub fn snapshot(&self) -> InventoryTable {
        InventoryTable {
            header: self.header,
            rows: self
                .rows
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub fn into_table(self) -> InventoryTable {
        InventoryTable {
            header: self.header,
            rows: self.rows.into_inner().unwrap_or_else(PoisonError::into_inner),
        }
    }
}
