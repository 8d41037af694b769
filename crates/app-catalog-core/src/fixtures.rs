//! Local fixture set
//!
//! A fixed, ordered list of raw records used instead of the catalog service
//! when the catalog runs in mock mode. Records stay raw here; normalization
//! happens per call in the retrieval layer.

use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::CatalogError;
use crate::Result;

/// Ordered raw records served in mock mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    records: Vec<Value>,
}

impl FixtureSet {
    /// Wrap an existing list of raw records.
    pub fn new(records: Vec<Value>) -> Self {
        FixtureSet { records }
    }

    /// Built-in demo catalog.
    pub fn builtin() -> Self {
        FixtureSet::new(vec![
            json!({
                "id": 1, "name": "Star Runner", "category": "games",
                "description": "Endless runner across a neon galaxy",
                "author": "Pixel Forge", "price": 0, "rating": 4.6,
                "downloads": 182000, "reviews": 5120, "publishedAt": "2023-03-14"
            }),
            json!({
                "id": 2, "name": "Ledger Lite", "category": "finance",
                "description": "Track spending without the spreadsheet",
                "author": "Coinwise", "price": "2.99", "rating": "4.2",
                "downloads": "56000", "reviews": "830", "publishedAt": "2022-11-02"
            }),
            json!({
                "id": 3, "name": "Word Garden", "category": "games",
                "description": "Grow a garden one word at a time",
                "author": "Leafy Labs", "price": null, "rating": 4.8,
                "downloads": 98000, "reviews": 2710, "publishedAt": "2023-07-21"
            }),
            json!({
                "id": 4, "name": "Focus Timer", "category": "tools",
                "description": "Pomodoro sessions with gentle reminders",
                "author": "Quiet Apps", "price": 1.99, "rating": 4.5,
                "downloads": 182000, "reviews": 3900, "publishedAt": "2021-05-09"
            }),
            json!({
                "id": 5, "name": "Lingo Bites", "category": "education",
                "description": "Five-minute language lessons",
                "author": "Polyglot Co", "price": 0, "rating": "",
                "downloads": 240000, "publishedAt": "2022-01-30"
            }),
            json!({
                "id": 6, "name": "Snap Notes", "category": "tools",
                "description": "Notes that sync across devices",
                "author": "Quiet Apps", "price": "free", "rating": 3.9,
                "downloads": 41000, "reviews": 615, "publishedAt": "2020-09-17"
            }),
            json!({
                "id": 7, "name": "Chess Tactics", "category": "games",
                "description": "Daily puzzles from master games",
                "author": "Gambit Studio", "price": 4.99, "rating": 4.8,
                "downloads": 73000, "reviews": 1980, "publishedAt": "2023-01-08"
            }),
            json!({
                "id": 8, "name": "Sky Watch", "category": "weather",
                "description": "Hyperlocal forecasts and radar",
                "author": "Nimbus", "price": 0, "rating": 4.1,
                "downloads": "n/a", "reviews": 1204, "publishedAt": "2019-12-01"
            }),
        ])
    }

    /// Parse a fixture set from JSON text: either an array of records or
    /// an object with an `apps` array.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Array(records) => Ok(FixtureSet::new(records)),
            Value::Object(mut map) => match map.remove("apps") {
                Some(Value::Array(records)) => Ok(FixtureSet::new(records)),
                _ => Err(CatalogError::InvalidFixtures(
                    "expected an array or an object with an `apps` array".to_string(),
                )),
            },
            other => Err(CatalogError::InvalidFixtures(format!(
                "expected an array, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Load a fixture set from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&text)?;
        debug!("Loaded {} fixture records from {:?}", set.len(), path);
        Ok(set)
    }

    /// Raw records in their fixed order.
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
