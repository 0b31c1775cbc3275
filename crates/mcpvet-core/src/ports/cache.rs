//! Directory cache port.
//!
//! Both cache tiers (in-process and durable) implement this trait.
//! Failures degrade to absence: a `load` that cannot read its backing
//! store returns `None`, a `store`/`invalidate` that fails is logged by
//! the adapter and swallowed. Cache trouble must never fail a fetch.

use async_trait::async_trait;

use crate::domain::DirectoryCacheEntry;

/// Port for a whole-value directory snapshot cache.
///
/// Writes always replace the full snapshot, never individual fields, so
/// concurrent readers observe either the old or the new snapshot but
/// never a mix.
#[async_trait]
pub trait DirectoryCache: Send + Sync {
    /// Load the cached snapshot, if present and readable.
    async fn load(&self) -> Option<DirectoryCacheEntry>;

    /// Replace the cached snapshot.
    async fn store(&self, entry: &DirectoryCacheEntry);

    /// Drop the cached snapshot.
    async fn invalidate(&self);
}
