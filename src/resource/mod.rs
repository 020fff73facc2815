//! Resource listing layer
//!
//! - [`request`] - Fully qualified listing calls, one variant per provider API
//! - [`fetcher`] - The page-level [`ListingService`] seam and the pagination
//!   loop built on top of it

mod fetcher;
mod request;

pub use fetcher::{fetch_all, fetch_all_as, paginate, ListingService, Page};
pub use request::ListRequest;
