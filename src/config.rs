//! Loader configuration with serde-friendly defaults.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_PAGE_LIMIT: usize = 20;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Tunables for the page loader.
///
/// Deserialisable so hosts can load it from their own configuration layer;
/// every field falls back to a sensible default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Reviews requested per page.
    pub page_limit: usize,
    /// Budget for a single image fetch, in milliseconds. An overrun fails
    /// only that URL, never the page.
    pub fetch_timeout_ms: u64,
    /// Upper bound on concurrently running image fetches per batch.
    pub max_concurrent_fetches: usize,
}

impl LoaderConfig {
    /// Returns the per-fetch budget as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}
