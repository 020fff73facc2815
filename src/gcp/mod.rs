//! GCP API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - Application Default Credentials or a static bearer token
//! - [`client`] - Shared client; implements the resource listing service
//! - [`http`] - HTTP utilities for REST API calls
//! - [`projects`] - The project directory
//! - `storage` - Bucket and object helpers for the export step
//!
//! # Example
//!
//! ```ignore
//! use gcp_inventory::gcp::{auth::GcpCredentials, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::new(GcpCredentials::new().await?)?;
//!     let routes = client.get(&client.compute_url("my-project", "global/routes")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
mod storage;
