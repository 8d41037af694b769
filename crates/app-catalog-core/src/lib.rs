//! App Catalog Core: data access for the app listing screen
//!
//! Retrieves app records from a local fixture set or from the catalog
//! service, normalizes their metrics and hands back a deterministically
//! ordered, optionally category-filtered list.
//!
//! ## Key Components
//!
//! - `AppRecord::normalize`: lenient metric coercion, zero defaults
//! - `SortSpec` / `make_comparator`: total order with an ascending-`id` tie-break
//! - `EndpointRules`: ordered rule table choosing the service endpoint and
//!   whether its output is already sorted
//! - `AppCatalog`: ties it together, sorting locally whenever the chosen
//!   source does not guarantee the requested order

pub mod catalog;
pub mod config;
mod error;
pub mod fakes;
pub mod fixtures;
pub mod http;
pub mod obs;
pub mod ordering;
pub mod record;
pub mod source;
pub mod strategy;

pub use catalog::{list_fixtures, records_from_payload, retrieve, AppCatalog, Listing, ListingSource};
pub use config::CatalogConfig;
pub use error::CatalogError;
pub use fixtures::FixtureSet;
pub use http::HttpFetcher;
pub use ordering::{
    make_comparator, preset, preset_index_for, sort_presets, SortKey, SortOrder, SortPreset,
    SortSpec,
};
pub use record::{coerce_number, normalize_all, AppRecord};
pub use source::{DataMode, ModeToggle, RemoteFetcher};
pub use strategy::{select_endpoint, Endpoint, EndpointRule, EndpointRules, EndpointSelection, ListQuery};

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
