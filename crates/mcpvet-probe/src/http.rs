//! HTTP probe adapter.
//!
//! Production implementation of the `HttpProbe` port on top of reqwest,
//! plus a canned-response fake for tests. Probes only ever issue GET
//! requests so a failed probe cannot have side effects on the target.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use mcpvet_core::ports::{HttpProbe, ProbeError, ProbeResponse, ProbeResult};

/// Production probe backed by a shared reqwest client.
///
/// The client carries no global timeout; every call supplies its own
/// bound per the port contract.
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    /// Create a probe with the crate's user agent.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mcpvet/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for ReqwestProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn get(
        &self,
        url: &Url,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> ProbeResult<ProbeResponse> {
        let mut request = self.client.get(url.as_str()).timeout(timeout);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(ProbeResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout
    } else {
        ProbeError::Network(e.to_string())
    }
}

// ============================================================================
// Fake Probe for Testing
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::{Duration, HttpProbe, ProbeError, ProbeResponse, ProbeResult, Url, async_trait};
    use std::sync::Mutex;

    /// Canned outcome for one URL pattern.
    #[derive(Clone)]
    pub enum CannedProbe {
        Response(ProbeResponse),
        Error(ProbeError),
    }

    /// A fake probe that matches requested URLs against substring
    /// patterns (first match wins, insertion order) and records every
    /// request for call-count assertions.
    #[derive(Default)]
    pub struct FakeProbe {
        responses: Mutex<Vec<(String, CannedProbe)>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeProbe {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for a URL pattern.
        #[must_use]
        pub fn with_response(
            self,
            url_contains: &str,
            status: u16,
            headers: &[(&str, &str)],
            body: &str,
        ) -> Self {
            self.responses.lock().unwrap().push((
                url_contains.to_string(),
                CannedProbe::Response(ProbeResponse {
                    status,
                    headers: headers
                        .iter()
                        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                        .collect(),
                    body: body.to_string(),
                }),
            ));
            self
        }

        /// Add a canned JSON response for a URL pattern.
        #[must_use]
        pub fn with_json(self, url_contains: &str, status: u16, json: &serde_json::Value) -> Self {
            self.with_response(
                url_contains,
                status,
                &[("content-type", "application/json")],
                &json.to_string(),
            )
        }

        /// Add a canned error for a URL pattern.
        #[must_use]
        pub fn with_error(self, url_contains: &str, error: ProbeError) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((url_contains.to_string(), CannedProbe::Error(error)));
            self
        }

        /// URLs requested so far, in order.
        #[must_use]
        pub fn request_log(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpProbe for FakeProbe {
        async fn get(
            &self,
            url: &Url,
            _headers: &[(String, String)],
            _timeout: Duration,
        ) -> ProbeResult<ProbeResponse> {
            self.requests.lock().unwrap().push(url.to_string());

            let responses = self.responses.lock().unwrap();
            for (pattern, canned) in responses.iter() {
                if url.as_str().contains(pattern.as_str()) {
                    return match canned {
                        CannedProbe::Response(response) => Ok(response.clone()),
                        CannedProbe::Error(error) => Err(error.clone()),
                    };
                }
            }
            Err(ProbeError::Network(format!(
                "no canned response for {url}"
            )))
        }
    }
}
