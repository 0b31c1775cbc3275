//! DNS resolver port.

use async_trait::async_trait;
use std::net::IpAddr;
use thiserror::Error;

/// Errors from hostname resolution.
#[derive(Debug, Clone, Error)]
pub enum DnsError {
    /// The resolver returned no records for the host.
    #[error("no DNS records for host: {0}")]
    NoRecords(String),

    /// Resolution failed (NXDOMAIN, resolver unreachable, ...).
    #[error("DNS resolution failed for {host}: {message}")]
    ResolutionFailed { host: String, message: String },

    /// Resolution did not complete within its timeout.
    #[error("DNS resolution timed out for {0}")]
    Timeout(String),
}

/// Port for resolving a hostname to addresses.
#[async_trait]
pub trait DnsResolverPort: Send + Sync {
    /// Resolve a hostname. An empty result is reported as
    /// [`DnsError::NoRecords`], never as `Ok(vec![])`.
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, DnsError>;
}
