//! Directory cache and search types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::server::{DeclaredAuthType, RemoteServerDescriptor, TransportKind};

/// How long a cached directory snapshot stays fresh.
pub const DIRECTORY_TTL_HOURS: i64 = 24;

/// A directory snapshot plus the moment it was built.
///
/// Stored whole-value in both cache tiers; never merged field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryCacheEntry {
    pub servers: Vec<RemoteServerDescriptor>,
    pub timestamp: DateTime<Utc>,
}

impl DirectoryCacheEntry {
    /// Build a snapshot stamped with the given time.
    #[must_use]
    pub const fn new(servers: Vec<RemoteServerDescriptor>, timestamp: DateTime<Utc>) -> Self {
        Self { servers, timestamp }
    }

    /// A snapshot is fresh iff it is younger than the directory TTL.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp < Duration::hours(DIRECTORY_TTL_HOURS)
    }
}

/// Where a fetched directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryOrigin {
    /// Rebuilt from the source of record on this call.
    Live,
    /// Served from a cache tier.
    Cache,
}

/// Cache state summary for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryCacheStatus {
    pub is_cached: bool,
    pub is_stale: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub server_count: usize,
}

/// Search filters over the directory.
///
/// Filters compose with logical AND; an unset field means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerFilters {
    /// Case-insensitive substring match against name, description,
    /// provider and tags.
    pub query: Option<String>,
    pub category: Option<String>,
    pub auth_type: Option<DeclaredAuthType>,
    pub transport: Option<TransportKind>,
    pub verified_only: bool,
}

impl ServerFilters {
    /// Whether a descriptor passes every set filter.
    #[must_use]
    pub fn matches(&self, server: &RemoteServerDescriptor) -> bool {
        if let Some(ref query) = self.query {
            let needle = query.to_lowercase();
            let hit = server.name.to_lowercase().contains(&needle)
                || server.description.to_lowercase().contains(&needle)
                || server.provider.to_lowercase().contains(&needle)
                || server
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(ref category) = self.category {
            if &server.category != category {
                return false;
            }
        }

        if let Some(auth_type) = self.auth_type {
            if server.auth_type != auth_type {
                return false;
            }
        }

        if let Some(transport) = self.transport {
            if server.transport != transport {
                return false;
            }
        }

        if self.verified_only && !server.verified {
            return false;
        }

        true
    }
}
