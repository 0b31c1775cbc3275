//! HTTP probe port.
//!
//! The verifier and the discovery engine only ever issue side-effect-free
//! GET requests, so the port is deliberately narrow: one method, explicit
//! headers, explicit per-call timeout. Production code uses the reqwest
//! adapter in `mcpvet-probe`; tests inject a fake.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors a probe request can produce.
///
/// Everything above the transport (unexpected status codes, malformed
/// bodies) is data, not an error: callers classify statuses themselves.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The request did not complete within its timeout.
    #[error("request timed out")]
    Timeout,

    /// DNS, connect, or transport-level failure.
    #[error("network error: {0}")]
    Network(String),
}

/// A raw HTTP response as seen by the probing layer.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    /// Response headers, original casing preserved.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ProbeResponse {
    /// Look up a header value, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON into the requested type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Port for issuing probe GET requests.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Issue a GET with the given headers, bounded by `timeout`.
    async fn get(
        &self,
        url: &Url,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> ProbeResult<ProbeResponse>;
}

// The verifier and the discovery engine share one probe.
#[async_trait]
impl<T: HttpProbe + ?Sized> HttpProbe for std::sync::Arc<T> {
    async fn get(
        &self,
        url: &Url,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> ProbeResult<ProbeResponse> {
        self.as_ref().get(url, headers, timeout).await
    }
}
