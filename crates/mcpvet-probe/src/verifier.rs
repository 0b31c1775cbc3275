//! Endpoint connection verification.
//!
//! Four stages run in strict order: DNS resolution, TLS certificate
//! inspection, HTTP reachability, protocol detection. DNS failure
//! aborts everything; TLS and protocol problems are warnings; HTTP
//! failure aborts unless it is an auth challenge. The verifier never
//! returns an error to its caller: every outcome is a
//! `ConnectionTestResult`.

use chrono::Utc;
use std::time::{Duration, Instant};
use url::Url;

use mcpvet_core::domain::{
    ConnectionErrorCode, ConnectionTestResult, ConnectionTestStep, DiscoveredServerInfo,
    StepStatus, TestStage, TransportKind,
};
use mcpvet_core::ports::{DnsResolverPort, HttpProbe, ProbeError, ProbeResponse, TlsInspectorPort};

use crate::http::ReqwestProbe;
use crate::net::{RustlsTlsInspector, TokioDnsResolver};

/// Bound for the TLS inspection stage.
pub const TLS_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound for the HTTP reachability stage.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Production verifier over the real network adapters.
pub type DefaultConnectionVerifier =
    ConnectionVerifier<ReqwestProbe, TokioDnsResolver, RustlsTlsInspector>;

/// Verifies that an endpoint is reachable and plausibly speaks MCP.
///
/// Generic over the network ports so every stage is testable with
/// fakes; use `DefaultConnectionVerifier` in production.
pub struct ConnectionVerifier<P, D, T> {
    probe: P,
    dns: D,
    tls: T,
}

impl DefaultConnectionVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ports(
            ReqwestProbe::new(),
            TokioDnsResolver::new(),
            RustlsTlsInspector::new(),
        )
    }
}

impl Default for DefaultConnectionVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, D, T> ConnectionVerifier<P, D, T>
where
    P: HttpProbe,
    D: DnsResolverPort,
    T: TlsInspectorPort,
{
    pub const fn with_ports(probe: P, dns: D, tls: T) -> Self {
        Self { probe, dns, tls }
    }

    /// Run the full verification sequence against one endpoint.
    pub async fn verify(
        &self,
        endpoint: &str,
        transport: TransportKind,
        timeout: Duration,
    ) -> ConnectionTestResult {
        let started = Instant::now();
        let mut steps = Vec::new();

        let url = match Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Dns,
                    StepStatus::Error,
                    format!("invalid endpoint URL: {e}"),
                ));
                return failure(steps, started, ConnectionErrorCode::NetworkError, None);
            }
        };
        let Some(host) = url.host_str().map(str::to_string) else {
            steps.push(ConnectionTestStep::new(
                TestStage::Dns,
                StepStatus::Error,
                "endpoint URL has no host",
            ));
            return failure(steps, started, ConnectionErrorCode::NetworkError, None);
        };

        // Stage 1: DNS. Fatal on failure.
        match self.dns.resolve(&host).await {
            Ok(ips) => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Dns,
                    StepStatus::Success,
                    format!("{host} resolved to {} address(es)", ips.len()),
                ));
            }
            Err(e) => {
                tracing::debug!(host = %host, error = %e, "DNS resolution failed");
                steps.push(ConnectionTestStep::new(
                    TestStage::Dns,
                    StepStatus::Error,
                    e.to_string(),
                ));
                return failure(steps, started, ConnectionErrorCode::NetworkError, None);
            }
        }

        // Stage 2: TLS certificate. Warnings only; some internal
        // deployments run self-signed on purpose.
        steps.push(self.inspect_tls(&url, &host).await);

        // Stage 3: HTTP reachability.
        let accept = [(
            "Accept".to_string(),
            "application/json, text/event-stream".to_string(),
        )];
        let response = match self.probe.get(&url, &accept, timeout).await {
            Ok(response) => response,
            Err(ProbeError::Timeout) => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Http,
                    StepStatus::Error,
                    format!("request timed out after {}ms", timeout.as_millis()),
                ));
                return failure(steps, started, ConnectionErrorCode::Timeout, None);
            }
            Err(ProbeError::Network(message)) => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Http,
                    StepStatus::Error,
                    message,
                ));
                return failure(steps, started, ConnectionErrorCode::NetworkError, None);
            }
        };

        let status = response.status;
        let auth_required = matches!(status, 401 | 403);
        match status {
            200..=399 => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Http,
                    StepStatus::Success,
                    format!("status {status}"),
                ));
            }
            // An auth challenge proves the server exists and speaks
            // HTTP, so reachability still counts as a success.
            401 | 403 => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Http,
                    StepStatus::Success,
                    format!("status {status} (authentication required)"),
                ));
            }
            429 => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Http,
                    StepStatus::Error,
                    "status 429 (rate limited)",
                ));
                return failure(
                    steps,
                    started,
                    ConnectionErrorCode::RateLimited,
                    Some(status),
                );
            }
            _ => {
                steps.push(ConnectionTestStep::new(
                    TestStage::Http,
                    StepStatus::Error,
                    format!("unexpected status {status}"),
                ));
                return failure(
                    steps,
                    started,
                    ConnectionErrorCode::ServerError,
                    Some(status),
                );
            }
        }

        // Stage 4: protocol detection. Heuristic, never fatal.
        let (detect_step, server_info) = detect_protocol(transport, &response);
        steps.push(detect_step);

        let error_code = auth_required.then_some(ConnectionErrorCode::AuthRequired);
        let suggestions = error_code.map(suggestions_for).unwrap_or_default();

        ConnectionTestResult {
            success: true,
            latency_ms: elapsed_ms(started),
            http_status: Some(status),
            steps,
            server_info,
            error_code,
            suggestions,
        }
    }

    async fn inspect_tls(&self, url: &Url, host: &str) -> ConnectionTestStep {
        if url.scheme() != "https" {
            return ConnectionTestStep::new(
                TestStage::Tls,
                StepStatus::Warning,
                format!("plain {} endpoint, certificate inspection skipped", url.scheme()),
            );
        }

        let port = url.port().unwrap_or(443);
        match self.tls.inspect(host, port, TLS_PROBE_TIMEOUT).await {
            Ok(info) if info.is_valid_at(Utc::now()) => ConnectionTestStep::new(
                TestStage::Tls,
                StepStatus::Success,
                format!("issued by {}, valid until {}", info.issuer, info.not_after),
            ),
            Ok(info) => ConnectionTestStep::new(
                TestStage::Tls,
                StepStatus::Warning,
                format!("certificate outside its validity window (expires {})", info.not_after),
            ),
            Err(e) => {
                tracing::debug!(host = %host, error = %e, "TLS inspection failed");
                ConnectionTestStep::new(TestStage::Tls, StepStatus::Warning, e.to_string())
            }
        }
    }
}

/// Best-effort check that the response looks like the expected
/// application protocol, plus whatever the body reveals about the server.
fn detect_protocol(
    transport: TransportKind,
    response: &ProbeResponse,
) -> (ConnectionTestStep, Option<DiscoveredServerInfo>) {
    let content_type = response.header("content-type").unwrap_or_default();
    let protocol_version = response.header("mcp-protocol-version").map(str::to_string);

    let confirmed = match transport {
        TransportKind::EventStream => content_type.contains("text/event-stream"),
        TransportKind::Http => {
            content_type.contains("application/json")
                || content_type.contains("text/event-stream")
                || protocol_version.is_some()
        }
    };

    if !confirmed {
        let step = ConnectionTestStep::new(
            TestStage::ProtocolDetect,
            StepStatus::Warning,
            format!("could not confirm MCP protocol (content-type: {content_type})"),
        );
        return (step, None);
    }

    let mut info = DiscoveredServerInfo {
        protocol_version,
        ..Default::default()
    };
    if let Ok(body) = response.json::<serde_json::Value>() {
        if let Some(capabilities) = body.get("capabilities").and_then(|v| v.as_object()) {
            info.capabilities = capabilities.keys().cloned().collect();
        }
        if let Some(tools) = body.get("tools").and_then(|v| v.as_array()) {
            info.tool_count = u32::try_from(tools.len()).ok();
        }
    }

    let step = ConnectionTestStep::new(
        TestStage::ProtocolDetect,
        StepStatus::Success,
        format!("endpoint speaks {content_type}"),
    );
    (step, Some(info))
}

/// Remediation hints per error code.
pub(crate) fn suggestions_for(code: ConnectionErrorCode) -> Vec<String> {
    let hints: &[&str] = match code {
        ConnectionErrorCode::NetworkError => &[
            "Check the endpoint URL.",
            "Check your network connection and firewall.",
        ],
        ConnectionErrorCode::Timeout => {
            &["The server may be slow; try again with a longer timeout."]
        }
        ConnectionErrorCode::RateLimited => {
            &["The server is rate limiting requests; wait a minute and retry."]
        }
        ConnectionErrorCode::ServerError => {
            &["The server returned an unexpected status; verify the endpoint path."]
        }
        ConnectionErrorCode::AuthRequired => {
            &["Run auth discovery to find out how to authenticate before connecting."]
        }
        ConnectionErrorCode::NotMcpServer => {
            &["The id has no directory entry; check the server directory."]
        }
        ConnectionErrorCode::TlsError | ConnectionErrorCode::AuthInvalid => &[],
    };
    hints.iter().map(ToString::to_string).collect()
}

fn failure(
    steps: Vec<ConnectionTestStep>,
    started: Instant,
    code: ConnectionErrorCode,
    http_status: Option<u16>,
) -> ConnectionTestResult {
    ConnectionTestResult {
        success: false,
        latency_ms: elapsed_ms(started),
        http_status,
        steps,
        server_info: None,
        error_code: Some(code),
        suggestions: suggestions_for(code),
    }
}

#[allow(clippy::cast_possible_truncation)] // probe latencies fit u64 milliseconds
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeProbe;
    use crate::net::testing::{FakeDns, FakeTls, FakeTlsOutcome};
    use serde_json::json;

    const ENDPOINT: &str = "https://mcp.example/mcp";

    fn verifier(
        probe: FakeProbe,
        tls: FakeTlsOutcome,
    ) -> ConnectionVerifier<FakeProbe, FakeDns, FakeTls> {
        ConnectionVerifier::with_ports(
            probe,
            FakeDns::new().with_host("mcp.example"),
            FakeTls::new(tls),
        )
    }

    fn timeout() -> Duration {
        Duration::from_secs(2)
    }

    #[tokio::test]
    async fn test_happy_path_all_stages_succeed() {
        let probe = FakeProbe::new().with_json(
            "mcp.example",
            200,
            &json!({"capabilities": {"tools": {}, "resources": {}}, "tools": [1, 2, 3]}),
        );
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(result.success);
        assert_eq!(result.error_code, None);
        assert_eq!(result.http_status, Some(200));
        assert_eq!(result.steps.len(), 4);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Success));

        let info = result.server_info.unwrap();
        assert_eq!(info.tool_count, Some(3));
        assert_eq!(info.capabilities.len(), 2);
    }

    #[tokio::test]
    async fn test_dns_failure_aborts_with_single_step() {
        let probe = FakeProbe::new().with_response("mcp.example", 200, &[], "");
        let verifier = ConnectionVerifier::with_ports(
            probe,
            FakeDns::new(), // knows no hosts
            FakeTls::new(FakeTlsOutcome::Valid),
        );
        let result = verifier
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(!result.success);
        assert_eq!(result.error_code, Some(ConnectionErrorCode::NetworkError));
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].stage, TestStage::Dns);
        assert_eq!(result.steps[0].status, StepStatus::Error);
    }

    #[tokio::test]
    async fn test_auth_challenge_is_success_with_marker() {
        let probe = FakeProbe::new().with_response(
            "mcp.example",
            401,
            &[
                ("content-type", "application/json"),
                ("www-authenticate", "Bearer realm=\"mcp\""),
            ],
            "{}",
        );
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(result.success);
        assert_eq!(result.error_code, Some(ConnectionErrorCode::AuthRequired));
        assert_eq!(result.http_status, Some(401));
        assert!(!result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_fails_and_stops_before_detection() {
        let probe = FakeProbe::new().with_response("mcp.example", 429, &[], "");
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(!result.success);
        assert_eq!(result.error_code, Some(ConnectionErrorCode::RateLimited));
        assert_eq!(result.steps.len(), 3);
        assert!(
            !result
                .steps
                .iter()
                .any(|s| s.stage == TestStage::ProtocolDetect)
        );
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let probe = FakeProbe::new().with_response("mcp.example", 500, &[], "");
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(!result.success);
        assert_eq!(result.error_code, Some(ConnectionErrorCode::ServerError));
        assert_eq!(result.http_status, Some(500));
    }

    #[tokio::test]
    async fn test_probe_timeout_maps_to_timeout_code() {
        let probe = FakeProbe::new().with_error("mcp.example", ProbeError::Timeout);
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(!result.success);
        assert_eq!(result.error_code, Some(ConnectionErrorCode::Timeout));
    }

    #[tokio::test]
    async fn test_tls_handshake_failure_is_warning_not_fatal() {
        let probe = FakeProbe::new().with_json("mcp.example", 200, &json!({}));
        let result = verifier(probe, FakeTlsOutcome::HandshakeFailure)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(result.success);
        let tls = result.tls_step().unwrap();
        assert_eq!(tls.status, StepStatus::Warning);
    }

    #[tokio::test]
    async fn test_expired_certificate_is_warning() {
        let probe = FakeProbe::new().with_json("mcp.example", 200, &json!({}));
        let result = verifier(probe, FakeTlsOutcome::Expired)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        assert!(result.success);
        assert_eq!(result.tls_step().unwrap().status, StepStatus::Warning);
    }

    #[tokio::test]
    async fn test_protocol_mismatch_is_warning() {
        let probe = FakeProbe::new().with_response(
            "mcp.example",
            200,
            &[("content-type", "text/html")],
            "<html></html>",
        );
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::EventStream, timeout())
            .await;

        assert!(result.success);
        let detect = result
            .steps
            .iter()
            .find(|s| s.stage == TestStage::ProtocolDetect)
            .unwrap();
        assert_eq!(detect.status, StepStatus::Warning);
        assert!(result.server_info.is_none());
    }

    #[tokio::test]
    async fn test_event_stream_content_type_confirms() {
        let probe = FakeProbe::new().with_response(
            "mcp.example",
            200,
            &[("content-type", "text/event-stream")],
            "",
        );
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::EventStream, timeout())
            .await;

        assert!(result.success);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Success));
    }

    #[tokio::test]
    async fn test_invalid_url_is_network_error() {
        let probe = FakeProbe::new();
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify("not a url", TransportKind::Http, timeout())
            .await;

        assert!(!result.success);
        assert_eq!(result.error_code, Some(ConnectionErrorCode::NetworkError));
        assert_eq!(result.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_protocol_version_header_confirms_http_transport() {
        let probe = FakeProbe::new().with_response(
            "mcp.example",
            200,
            &[
                ("content-type", "text/plain"),
                ("mcp-protocol-version", "2025-06-18"),
            ],
            "",
        );
        let result = verifier(probe, FakeTlsOutcome::Valid)
            .verify(ENDPOINT, TransportKind::Http, timeout())
            .await;

        let info = result.server_info.unwrap();
        assert_eq!(info.protocol_version.as_deref(), Some("2025-06-18"));
    }
}
