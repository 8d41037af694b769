//! In-memory fakes for the remote fetch collaborator (testing only)
//!
//! Provides `SpyFetcher`, which serves canned payloads and records every
//! requested path, and `FailingFetcher`, which fails every request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CatalogError;
use crate::source::RemoteFetcher;
use crate::Result;

// ---------------------------------------------------------------------------
// SpyFetcher
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SpyState {
    default_payload: Value,
    by_path: HashMap<String, Value>,
    calls: Vec<String>,
}

/// Canned-response fetcher that records requested paths.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the catalog owns another.
#[derive(Debug, Clone, Default)]
pub struct SpyFetcher {
    state: Arc<Mutex<SpyState>>,
}

impl SpyFetcher {
    /// Serve `payload` for every path.
    pub fn new(payload: Value) -> Self {
        SpyFetcher {
            state: Arc::new(Mutex::new(SpyState {
                default_payload: payload,
                ..SpyState::default()
            })),
        }
    }

    /// Serve `payload` for `path` only.
    pub fn with_path(self, path: &str, payload: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .by_path
            .insert(path.to_string(), payload);
        self
    }

    /// Paths requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl RemoteFetcher for SpyFetcher {
    async fn get(&self, path: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(path.to_string());
        Ok(state
            .by_path
            .get(path)
            .cloned()
            .unwrap_or_else(|| state.default_payload.clone()))
    }
}

// ---------------------------------------------------------------------------
// FailingFetcher
// ---------------------------------------------------------------------------

/// Fetcher whose every request fails, as an unreachable service would.
#[derive(Debug, Clone)]
pub struct FailingFetcher {
    status: Option<u16>,
}

impl FailingFetcher {
    /// Fail with a transport error.
    pub fn transport() -> Self {
        FailingFetcher { status: None }
    }

    /// Fail with an HTTP status error.
    pub fn status(status: u16) -> Self {
        FailingFetcher {
            status: Some(status),
        }
    }
}

#[async_trait]
impl RemoteFetcher for FailingFetcher {
    async fn get(&self, path: &str) -> Result<Value> {
        Err(match self.status {
            Some(401) => CatalogError::Unauthorized,
            Some(status) => CatalogError::Status {
                status,
                body: format!("failed: {path}"),
            },
            None => CatalogError::Http(format!("connection refused: {path}")),
        })
    }
}
