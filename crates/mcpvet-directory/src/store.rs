//! Directory store: fetch, search, details, cache status.
//!
//! Fetch order is in-process cache, then durable cache, then a catalog
//! rebuild. A rebuild replaces both tiers with a freshly stamped
//! snapshot. When the rebuild fails, a stale snapshot is still returned
//! (marked stale) rather than failing the caller; only "no snapshot
//! anywhere" surfaces as an error.

use chrono::{DateTime, Utc};

use mcpvet_core::domain::{
    DirectoryCacheEntry, DirectoryCacheStatus, DirectoryOrigin, RemoteServerDescriptor,
    ServerFilters,
};
use mcpvet_core::ports::{Clock, DirectoryCache, SystemClock};

use crate::catalog::{CatalogSource, CuratedSource};
use crate::cache::MemoryCache;
use crate::error::{DirectoryError, DirectoryResult};

/// Outcome of a directory fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub servers: Vec<RemoteServerDescriptor>,
    pub origin: DirectoryOrigin,
    pub timestamp: DateTime<Utc>,
    /// True when a cached snapshot older than the TTL was served
    /// opportunistically.
    pub stale: bool,
}

/// The server directory store.
///
/// Generic over its clock and catalog source so TTL behavior and rebuild
/// failures are testable without sleeping or touching the network.
pub struct DirectoryStore<S = CuratedSource, C = SystemClock>
where
    S: CatalogSource,
    C: Clock,
{
    memory: MemoryCache,
    durable: Box<dyn DirectoryCache>,
    source: S,
    clock: C,
}

impl DirectoryStore {
    /// Production store over the curated catalog and the system clock.
    #[must_use]
    pub fn new(durable: Box<dyn DirectoryCache>) -> Self {
        Self::with_parts(durable, CuratedSource, SystemClock)
    }
}

impl<S: CatalogSource, C: Clock> DirectoryStore<S, C> {
    /// Build a store from explicit parts. Used by tests to inject a
    /// fixed clock or a failing source.
    #[must_use]
    pub fn with_parts(durable: Box<dyn DirectoryCache>, source: S, clock: C) -> Self {
        Self {
            memory: MemoryCache::new(),
            durable,
            source,
            clock,
        }
    }

    /// Fetch the directory, preferring fresh cache tiers unless
    /// `force_refresh` is set.
    pub async fn fetch(&self, force_refresh: bool) -> DirectoryResult<FetchOutcome> {
        let now = self.clock.now();

        if !force_refresh {
            if let Some(entry) = self.memory.load().await {
                if entry.is_fresh(now) {
                    return Ok(Self::from_cache(entry, false));
                }
            }

            if let Some(entry) = self.durable.load().await {
                if entry.is_fresh(now) {
                    // Warm the in-process tier for the next call.
                    self.memory.store(&entry).await;
                    return Ok(Self::from_cache(entry, false));
                }
            }
        }

        match self.rebuild(now).await {
            Ok(entry) => Ok(FetchOutcome {
                servers: entry.servers,
                origin: DirectoryOrigin::Live,
                timestamp: entry.timestamp,
                stale: false,
            }),
            Err(e) => {
                // Serve whatever snapshot survives, marked stale if it is.
                let fallback = match self.memory.load().await {
                    Some(entry) => Some(entry),
                    None => self.durable.load().await,
                };
                match fallback {
                    Some(entry) => {
                        tracing::warn!(error = %e, "directory rebuild failed, serving cached snapshot");
                        let stale = !entry.is_fresh(now);
                        Ok(Self::from_cache(entry, stale))
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Search the directory with AND-composed filters.
    pub async fn search(
        &self,
        filters: &ServerFilters,
    ) -> DirectoryResult<Vec<RemoteServerDescriptor>> {
        let outcome = self.fetch(false).await?;
        Ok(outcome
            .servers
            .into_iter()
            .filter(|s| filters.matches(s))
            .collect())
    }

    /// Look up one entry by id.
    pub async fn details(&self, id: &str) -> DirectoryResult<RemoteServerDescriptor> {
        let outcome = self.fetch(false).await?;
        outcome
            .servers
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }

    /// Report the cache state without triggering a rebuild.
    pub async fn cache_status(&self) -> DirectoryCacheStatus {
        let now = self.clock.now();
        let entry = match self.memory.load().await {
            Some(entry) => Some(entry),
            None => self.durable.load().await,
        };

        entry.map_or(
            DirectoryCacheStatus {
                is_cached: false,
                is_stale: false,
                last_updated: None,
                server_count: 0,
            },
            |entry| DirectoryCacheStatus {
                is_cached: true,
                is_stale: !entry.is_fresh(now),
                last_updated: Some(entry.timestamp),
                server_count: entry.servers.len(),
            },
        )
    }

    /// Rebuild the catalog and replace both cache tiers.
    async fn rebuild(&self, now: DateTime<Utc>) -> DirectoryResult<DirectoryCacheEntry> {
        let servers = self.source.build().await?;
        let entry = DirectoryCacheEntry::new(servers, now);

        // Whole-value replacement on both tiers; last writer wins.
        self.memory.store(&entry).await;
        self.durable.store(&entry).await;

        tracing::info!(server_count = entry.servers.len(), "directory rebuilt");
        Ok(entry)
    }

    fn from_cache(entry: DirectoryCacheEntry, stale: bool) -> FetchOutcome {
        FetchOutcome {
            servers: entry.servers,
            origin: DirectoryOrigin::Cache,
            timestamp: entry.timestamp,
            stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use mcpvet_core::ports::clock_testing::FixedClock;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that fails after an optional number of successes.
    struct FlakySource {
        successes_allowed: usize,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CatalogSource for FlakySource {
        async fn build(&self) -> DirectoryResult<Vec<RemoteServerDescriptor>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.successes_allowed {
                Ok(crate::catalog::curated_catalog())
            } else {
                Err(DirectoryError::RebuildFailed("registry offline".to_string()))
            }
        }
    }

    fn fixed_store(
        successes: usize,
    ) -> (
        DirectoryStore<FlakySource, Arc<FixedClock>>,
        Arc<FixedClock>,
        Arc<AtomicUsize>,
    ) {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let calls = Arc::new(AtomicUsize::new(0));
        let store = DirectoryStore::with_parts(
            Box::new(MemoryCache::new()),
            FlakySource {
                successes_allowed: successes,
                calls: Arc::clone(&calls),
            },
            Arc::clone(&clock),
        );
        (store, clock, calls)
    }

    #[tokio::test]
    async fn test_first_fetch_is_live_second_is_cache() {
        let (store, _clock, calls) = fixed_store(10);

        let first = store.fetch(false).await.unwrap();
        assert_eq!(first.origin, DirectoryOrigin::Live);

        let second = store.fetch(false).await.unwrap();
        assert_eq!(second.origin, DirectoryOrigin::Cache);
        assert_eq!(second.servers, first.servers);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_rebuilds() {
        let (store, _clock, calls) = fixed_store(10);
        store.fetch(false).await.unwrap();

        let forced = store.fetch(true).await.unwrap();
        assert_eq!(forced.origin, DirectoryOrigin::Live);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_cache_triggers_rebuild() {
        let (store, clock, calls) = fixed_store(10);
        store.fetch(false).await.unwrap();

        clock.set(clock.as_ref().now() + Duration::hours(25));
        let outcome = store.fetch(false).await.unwrap();
        assert_eq!(outcome.origin, DirectoryOrigin::Live);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rebuild_failure_serves_stale_snapshot() {
        let (store, clock, _calls) = fixed_store(1);
        store.fetch(false).await.unwrap();

        clock.set(clock.as_ref().now() + Duration::hours(25));
        let outcome = store.fetch(false).await.unwrap();
        assert_eq!(outcome.origin, DirectoryOrigin::Cache);
        assert!(outcome.stale);
    }

    #[tokio::test]
    async fn test_rebuild_failure_with_no_cache_is_an_error() {
        let (store, _clock, _calls) = fixed_store(0);
        let err = store.fetch(false).await.unwrap_err();
        assert!(matches!(err, DirectoryError::RebuildFailed(_)));
    }

    #[tokio::test]
    async fn test_cache_status_ttl_boundary() {
        let (store, clock, _calls) = fixed_store(10);

        let empty = store.cache_status().await;
        assert!(!empty.is_cached);
        assert!(empty.last_updated.is_none());

        store.fetch(false).await.unwrap();
        clock.set(clock.as_ref().now() + Duration::hours(1));
        let fresh = store.cache_status().await;
        assert!(fresh.is_cached);
        assert!(!fresh.is_stale);

        clock.set(clock.as_ref().now() + Duration::hours(24));
        let stale = store.cache_status().await;
        assert!(stale.is_cached);
        assert!(stale.is_stale);
        assert!(stale.server_count > 0);
    }

    #[tokio::test]
    async fn test_search_filters_apply() {
        let (store, _clock, _calls) = fixed_store(10);
        let filters = ServerFilters {
            category: Some("payments".to_string()),
            ..Default::default()
        };
        let hits = store.search(&filters).await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|s| s.category == "payments"));
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let (store, _clock, _calls) = fixed_store(10);
        let err = store.details("no-such-server").await.unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));

        let hit = store.details("github-mcp").await.unwrap();
        assert_eq!(hit.id, "github-mcp");
    }

    #[tokio::test]
    async fn test_durable_tier_warms_memory() {
        // Pre-populate only the durable tier, then fetch.
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let durable = MemoryCache::new();
        let entry =
            DirectoryCacheEntry::new(crate::catalog::curated_catalog(), clock.as_ref().now());
        durable.store(&entry).await;

        let store = DirectoryStore::with_parts(
            Box::new(durable),
            FlakySource {
                successes_allowed: 0,
                calls: Arc::new(AtomicUsize::new(0)),
            },
            Arc::clone(&clock),
        );

        let outcome = store.fetch(false).await.unwrap();
        assert_eq!(outcome.origin, DirectoryOrigin::Cache);
        assert!(!outcome.stale);
    }
}
