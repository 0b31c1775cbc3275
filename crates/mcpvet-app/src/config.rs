//! Facade configuration.

use std::path::PathBuf;
use std::time::Duration;

use mcpvet_probe::{DEFAULT_BATCH_CONCURRENCY, DEFAULT_HTTP_TIMEOUT};

/// Configuration for [`crate::VetService`].
///
/// Built with defaults and tweaked through the `with_*` methods.
#[derive(Debug, Clone)]
pub struct VetConfig {
    /// Durable directory cache location.
    pub cache_path: PathBuf,
    /// Timeout for each connection test's HTTP stage.
    pub default_timeout: Duration,
    /// Endpoints verified concurrently during batch runs.
    pub batch_concurrency: usize,
}

impl VetConfig {
    /// Configuration rooted at the given cache file.
    #[must_use]
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            default_timeout: DEFAULT_HTTP_TIMEOUT,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }
}
