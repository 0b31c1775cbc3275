//! TLS inspection port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from a TLS certificate inspection.
#[derive(Debug, Clone, Error)]
pub enum TlsError {
    /// TCP connection to the TLS port failed.
    #[error("TCP connect to {host}:{port} failed: {message}")]
    ConnectFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// TLS handshake failed (untrusted chain, protocol mismatch, ...).
    #[error("TLS handshake with {host} failed: {message}")]
    HandshakeFailed { host: String, message: String },

    /// The peer presented no certificate, or it could not be decoded.
    #[error("peer certificate unavailable for {0}")]
    NoCertificate(String),

    /// Inspection did not complete within its timeout.
    #[error("TLS inspection timed out for {0}")]
    Timeout(String),
}

/// Peer certificate facts the verifier cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsCertificateInfo {
    pub issuer: String,
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl TlsCertificateInfo {
    /// Whether the validity window covers the given instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now <= self.not_after
    }
}

/// Port for opening a TLS connection and reading the peer certificate.
#[async_trait]
pub trait TlsInspectorPort: Send + Sync {
    async fn inspect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<TlsCertificateInfo, TlsError>;
}
