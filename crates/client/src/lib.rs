//! `curio-client` — headless client for the catalog API.
//!
//! `ApiClient` talks to the HTTP API; `CatalogView` holds the locally
//! cached item list with pure filter/sort recomputation, the way the UI
//! consumes it.

pub mod api;
pub mod view;

pub use api::{ApiClient, ClientError, ImageUpload, NewItemForm};
pub use view::{CatalogView, SortKey};
