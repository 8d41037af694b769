//! Data-source seams: the remote fetch collaborator and the mode toggle
//!
//! `RemoteFetcher` is the boundary to the catalog service. The HTTP client
//! in `http` implements it for real use; `fakes` provides in-memory
//! implementations for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Fetches a decoded JSON body from a catalog service path.
///
/// Contract:
/// - Transport or HTTP failures are returned as errors.
/// - On success the decoded body is returned whatever its shape; shape
///   checking belongs to the caller.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// GET `path` (e.g. `/apps/sort/rating`) and decode the body.
    async fn get(&self, path: &str) -> Result<Value>;
}

#[async_trait]
impl<T: RemoteFetcher + ?Sized> RemoteFetcher for Arc<T> {
    async fn get(&self, path: &str) -> Result<Value> {
        (**self).get(path).await
    }
}

/// Where a listing call gets its records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Local fixture set, no network
    Fixtures,
    /// Catalog service
    Remote,
}

impl DataMode {
    /// Mode for a "use mock" flag.
    pub fn from_use_mock(use_mock: bool) -> Self {
        if use_mock {
            DataMode::Fixtures
        } else {
            DataMode::Remote
        }
    }
}

/// Shared mock-mode switch.
///
/// Clones share the same flag, so a front end can flip it while the
/// catalog reads it once at the start of each call.
#[derive(Debug, Clone, Default)]
pub struct ModeToggle {
    use_mock: Arc<AtomicBool>,
}

impl ModeToggle {
    /// Create a toggle with an initial value.
    pub fn new(use_mock: bool) -> Self {
        ModeToggle {
            use_mock: Arc::new(AtomicBool::new(use_mock)),
        }
    }

    /// Current flag value.
    pub fn get_use_mock(&self) -> bool {
        self.use_mock.load(Ordering::SeqCst)
    }

    /// Set the flag.
    pub fn set_use_mock(&self, use_mock: bool) {
        self.use_mock.store(use_mock, Ordering::SeqCst);
    }

    /// Snapshot the flag as a `DataMode`.
    pub fn mode(&self) -> DataMode {
        DataMode::from_use_mock(self.get_use_mock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_clones_share_state() {
        let toggle = ModeToggle::new(false);
        let view = toggle.clone();
        assert_eq!(view.mode(), DataMode::Remote);

        toggle.set_use_mock(true);
        assert!(view.get_use_mock());
        assert_eq!(view.mode(), DataMode::Fixtures);
    }

    #[test]
    fn test_default_toggle_is_remote() {
        assert_eq!(ModeToggle::default().mode(), DataMode::Remote);
    }
}
