//! Remote endpoint selection
//!
//! A query is matched against an ordered rule table; the first rule whose
//! predicate holds picks the endpoint. Each selection carries an explicit
//! `presorted` tag saying whether the endpoint already guarantees the
//! requested order, so the caller never has to inspect the path to decide
//! whether to sort.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ordering::{SortKey, SortOrder, SortSpec};

/// One listing request: sort plus optional category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Requested ordering
    #[serde(flatten)]
    pub sort: SortSpec,
    /// Category filter; `None` or empty means no filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ListQuery {
    /// Query with the given sort and no filter.
    pub fn new(sort: SortSpec) -> Self {
        ListQuery {
            sort,
            category: None,
        }
    }

    /// Restrict the query to one category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Effective category filter. An empty string counts as no filter.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    fn is_unfiltered_sort(&self, key: &SortKey, order: SortOrder) -> bool {
        self.category().is_none() && &self.sort.sort_by == key && self.sort.order == order
    }
}

/// Catalog service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/apps`: every record, unspecified order
    All,
    /// `/apps/sort/downloads`: every record, downloads descending
    SortedByDownloads,
    /// `/apps/sort/rating`: every record, rating descending
    SortedByRating,
    /// `/apps/category/{category}`: one category, unspecified order
    Category(String),
}

impl Endpoint {
    /// Request path, with the category percent-encoded as one segment.
    pub fn path(&self) -> String {
        match self {
            Endpoint::All => "/apps".to_string(),
            Endpoint::SortedByDownloads => "/apps/sort/downloads".to_string(),
            Endpoint::SortedByRating => "/apps/sort/rating".to_string(),
            Endpoint::Category(category) => {
                format!("/apps/category/{}", urlencoding::encode(category))
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of endpoint selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSelection {
    /// Endpoint to fetch from
    pub endpoint: Endpoint,
    /// The endpoint already returns records in the requested order
    pub presorted: bool,
    /// Name of the rule that matched
    pub rule: &'static str,
}

impl EndpointSelection {
    /// Whether the fetched records must be sorted locally.
    pub fn needs_fallback_sort(&self) -> bool {
        !self.presorted
    }
}

type Predicate = Box<dyn Fn(&ListQuery) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&ListQuery) -> Endpoint + Send + Sync>;

/// A predicate/handler pair in the rule table.
pub struct EndpointRule {
    name: &'static str,
    presorted: bool,
    predicate: Predicate,
    handler: Handler,
}

impl EndpointRule {
    /// Create a rule. `presorted` states whether the handler's endpoint
    /// guarantees the order the predicate matched on.
    pub fn new(
        name: &'static str,
        presorted: bool,
        predicate: impl Fn(&ListQuery) -> bool + Send + Sync + 'static,
        handler: impl Fn(&ListQuery) -> Endpoint + Send + Sync + 'static,
    ) -> Self {
        EndpointRule {
            name,
            presorted,
            predicate: Box::new(predicate),
            handler: Box::new(handler),
        }
    }

    /// Rule name, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, query: &ListQuery) -> Option<EndpointSelection> {
        if !(self.predicate)(query) {
            return None;
        }
        Some(EndpointSelection {
            endpoint: (self.handler)(query),
            presorted: self.presorted,
            rule: self.name,
        })
    }
}

impl fmt::Debug for EndpointRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointRule")
            .field("name", &self.name)
            .field("presorted", &self.presorted)
            .finish_non_exhaustive()
    }
}

/// Ordered rule table, evaluated top-down.
#[derive(Debug)]
pub struct EndpointRules {
    rules: Vec<EndpointRule>,
}

impl EndpointRules {
    /// Empty table. Selection against it always yields `/apps`.
    pub fn empty() -> Self {
        EndpointRules { rules: Vec::new() }
    }

    /// Add a rule after the existing ones.
    pub fn push(&mut self, rule: EndpointRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Add a rule ahead of the existing ones.
    pub fn push_front(&mut self, rule: EndpointRule) -> &mut Self {
        self.rules.insert(0, rule);
        self
    }

    /// Rule names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(EndpointRule::name).collect()
    }

    /// Pick the endpoint for `query`. Falls through to the generic
    /// endpoint, which is never trusted to be sorted.
    pub fn select(&self, query: &ListQuery) -> EndpointSelection {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(query))
            .unwrap_or(EndpointSelection {
                endpoint: Endpoint::All,
                presorted: false,
                rule: "all",
            })
    }
}

impl Default for EndpointRules {
    fn default() -> Self {
        let mut rules = EndpointRules::empty();
        rules
            .push(EndpointRule::new(
                "sorted_by_downloads",
                true,
                |q| q.is_unfiltered_sort(&SortKey::Downloads, SortOrder::Desc),
                |_| Endpoint::SortedByDownloads,
            ))
            .push(EndpointRule::new(
                "sorted_by_rating",
                true,
                |q| q.is_unfiltered_sort(&SortKey::Rating, SortOrder::Desc),
                |_| Endpoint::SortedByRating,
            ))
            .push(EndpointRule::new(
                "by_category",
                false,
                |q| q.category().is_some(),
                |q| Endpoint::Category(q.category().unwrap_or_default().to_string()),
            ));
        rules
    }
}

/// Select with the default rule table.
pub fn select_endpoint(query: &ListQuery) -> EndpointSelection {
    EndpointRules::default().select(query)
}
