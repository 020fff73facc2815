//! Inventory collection
//!
//! Fans a resource listing out across every project, isolates failures per
//! (project, scope), and merges the results into one table per kind.
//!
//! # Architecture
//!
//! - [`collector`] - One task per project, joined, then merged under one lock
//! - [`kinds`] - One [`Enumerator`] per resource kind with its row mapping
//! - [`lookup`] - Per-(project, zone) side tables such as machine types
//! - [`table`] - [`InventoryTable`] and the fan-in accumulator
//! - [`normalize`] - Self-link reduction shared by every kind
//!
//! # Example
//!
//! ```ignore
//! let collector = Collector::new(Arc::new(client));
//! let table = collector
//!     .collect(ResourceKind::Instances, &projects, &ScopeSet::new(zones, regions))
//!     .await;
//! ```

pub mod collector;
pub mod kind;
pub mod kinds;
pub mod lookup;
pub mod normalize;
pub mod table;

pub use collector::{Collector, Enumerator};
pub use kind::{ResourceKind, ScopeQualifier, ScopeSet};
pub use lookup::{LookupCache, LookupEntry};
pub use normalize::{normalize_ref, normalize_refs};
pub use table::{InventoryTable, Row, TableAccumulator};
