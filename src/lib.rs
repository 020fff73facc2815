//! GCP inventory collection
//!
//! Enumerates compute, network and storage resources across every project the
//! caller can see and produces one table per resource kind.
//!
//! - [`inventory`] - The concurrent per-project collector and resource kinds
//! - [`resource`] - Listing requests and pagination
//! - [`gcp`] - Authentication, HTTP and the GCP-backed services
//! - [`export`] - Sheet assembly, encoding and sinks
//! - [`config`] - Layered run configuration

pub mod config;
pub mod error;
pub mod export;
pub mod gcp;
pub mod inventory;
pub mod resource;

#[cfg(test)]
mod testing;

pub use error::{ApiError, ConfigError, InventoryError};
