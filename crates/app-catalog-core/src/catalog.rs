//! Retrieval strategy
//!
//! `AppCatalog::list` answers one listing query:
//! - Fixture mode: normalize the fixture set, filter by category, sort.
//! - Remote mode: pick an endpoint from the rule table, fetch, normalize,
//!   and sort locally unless the endpoint is tagged as presorted.
//!
//! Fetch errors propagate unchanged. A payload that is not a JSON array
//! becomes an empty listing.

use std::path::PathBuf;

use serde_json::Value;

use crate::config::CatalogConfig;
use crate::fixtures::FixtureSet;
use crate::http::HttpFetcher;
use crate::obs;
use crate::record::{normalize_all, AppRecord};
use crate::source::{DataMode, ModeToggle, RemoteFetcher};
use crate::strategy::{EndpointRules, EndpointSelection, ListQuery};
use crate::Result;

/// Where a listing came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    /// Local fixture set
    Fixtures,
    /// Catalog service endpoint
    Remote(EndpointSelection),
}

/// Records plus provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Ordered, normalized records
    pub records: Vec<AppRecord>,
    /// Source that served them
    pub source: ListingSource,
    /// Whether the records were sorted on this side
    pub sorted_locally: bool,
}

/// Listing entry point: fixtures, rule table, fetcher and mode switch.
#[derive(Debug)]
pub struct AppCatalog<F> {
    fetcher: F,
    fixtures: FixtureSet,
    fixture_file: Option<PathBuf>,
    rules: EndpointRules,
    mode: ModeToggle,
}

impl AppCatalog<HttpFetcher> {
    /// Build an HTTP-backed catalog from configuration.
    ///
    /// A configured fixture file is only read by fixture-mode calls.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let mut catalog = AppCatalog::new(HttpFetcher::new(config)?)
            .with_mode_toggle(ModeToggle::new(config.use_mock));
        if let Some(path) = &config.fixtures_path {
            catalog = catalog.with_fixture_file(path);
        }
        Ok(catalog)
    }
}

impl<F: RemoteFetcher> AppCatalog<F> {
    /// Catalog over `fetcher` with the built-in fixtures, default rules and
    /// remote mode.
    pub fn new(fetcher: F) -> Self {
        AppCatalog {
            fetcher,
            fixtures: FixtureSet::builtin(),
            fixture_file: None,
            rules: EndpointRules::default(),
            mode: ModeToggle::default(),
        }
    }

    /// Replace the fixture set.
    pub fn with_fixtures(mut self, fixtures: FixtureSet) -> Self {
        self.fixtures = fixtures;
        self
    }

    /// Serve fixture mode from a JSON file, read on each fixture-mode call.
    /// Takes precedence over `with_fixtures`.
    pub fn with_fixture_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixture_file = Some(path.into());
        self
    }

    /// Replace the endpoint rule table.
    pub fn with_rules(mut self, rules: EndpointRules) -> Self {
        self.rules = rules;
        self
    }

    /// Share an existing mode switch.
    pub fn with_mode_toggle(mut self, mode: ModeToggle) -> Self {
        self.mode = mode;
        self
    }

    /// Handle to the mode switch.
    pub fn mode_toggle(&self) -> &ModeToggle {
        &self.mode
    }

    /// Underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Ordered records for `query`.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<AppRecord>> {
        Ok(self.list_detailed(query).await?.records)
    }

    /// Ordered records for `query`, with where they came from.
    pub async fn list_detailed(&self, query: &ListQuery) -> Result<Listing> {
        let mode = self.mode.mode();
        match (mode, &self.fixture_file) {
            (DataMode::Fixtures, Some(path)) => {
                let fixtures = FixtureSet::from_path(path)?;
                retrieve(query, mode, &fixtures, &self.rules, &self.fetcher).await
            }
            _ => retrieve(query, mode, &self.fixtures, &self.rules, &self.fetcher).await,
        }
    }
}

/// One listing call with every input explicit.
pub async fn retrieve<F: RemoteFetcher + ?Sized>(
    query: &ListQuery,
    mode: DataMode,
    fixtures: &FixtureSet,
    rules: &EndpointRules,
    fetcher: &F,
) -> Result<Listing> {
    obs::emit_list_requested(query, mode);

    let listing = match mode {
        DataMode::Fixtures => Listing {
            records: list_fixtures(fixtures, query),
            source: ListingSource::Fixtures,
            sorted_locally: true,
        },
        DataMode::Remote => {
            let selection = rules.select(query);
            obs::emit_endpoint_selected(&selection);

            let path = selection.endpoint.path();
            let payload = fetcher.get(&path).await?;
            let mut records = records_from_payload(&payload, &path);

            let sorted_locally = selection.needs_fallback_sort();
            if sorted_locally {
                obs::emit_fallback_sort(records.len());
                query.sort.sort(&mut records);
            }
            Listing {
                records,
                source: ListingSource::Remote(selection),
                sorted_locally,
            }
        }
    };

    obs::emit_list_completed(listing.records.len(), listing.sorted_locally);
    Ok(listing)
}

/// Fixture-mode listing: normalize, filter, always sort.
pub fn list_fixtures(fixtures: &FixtureSet, query: &ListQuery) -> Vec<AppRecord> {
    let mut records = normalize_all(fixtures.records());
    if let Some(category) = query.category() {
        records.retain(|r| r.category.as_deref() == Some(category));
    }
    query.sort.sort(&mut records);
    records
}

/// Normalize a fetched payload. Anything but an array yields no records.
pub fn records_from_payload(payload: &Value, path: &str) -> Vec<AppRecord> {
    match payload {
        Value::Array(items) => normalize_all(items),
        other => {
            let kind = match other {
                Value::Null => "null",
                Value::Bool(_) => "bool",
                Value::Number(_) => "number",
                Value::String(_) => "string",
                _ => "object",
            };
            obs::emit_malformed_payload(path, kind);
            Vec::new()
        }
    }
}
