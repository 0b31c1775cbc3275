//! Connection verification result types.
//!
//! A verification runs DNS resolution, TLS inspection, HTTP reachability
//! and protocol detection in strict order and reports one step per stage.
//! Results are transient: computed fresh per call, never persisted.

use serde::{Deserialize, Serialize};

/// One stage of the verification sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestStage {
    Dns,
    Tls,
    Http,
    ProtocolDetect,
}

/// Outcome of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Warning,
    Error,
    Pending,
}

/// A named stage with its outcome and free-text detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestStep {
    pub stage: TestStage,
    pub status: StepStatus,
    pub detail: String,
}

impl ConnectionTestStep {
    pub fn new(stage: TestStage, status: StepStatus, detail: impl Into<String>) -> Self {
        Self {
            stage,
            status,
            detail: detail.into(),
        }
    }
}

/// Closed error taxonomy for connection testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionErrorCode {
    NetworkError,
    Timeout,
    TlsError,
    /// Server answered 401/403. Non-fatal: the challenge proves the
    /// endpoint exists and speaks HTTP, so it may accompany an overall
    /// successful result.
    AuthRequired,
    AuthInvalid,
    NotMcpServer,
    ServerError,
    RateLimited,
}

impl ConnectionErrorCode {
    /// Whether this code still counts as a reachable endpoint.
    #[must_use]
    pub const fn is_non_fatal(self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

/// What the endpoint told us about itself during protocol detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveredServerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_count: Option<u32>,
}

/// Outcome of verifying one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestResult {
    /// True iff no stage produced a hard failure.
    pub success: bool,

    /// Wall time of the whole sequence in milliseconds.
    pub latency_ms: u64,

    /// HTTP status, if the reachability stage got a response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,

    /// Ordered step list, one per attempted stage.
    pub steps: Vec<ConnectionTestStep>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_info: Option<DiscoveredServerInfo>,

    /// Set on failure, or `AuthRequired` alongside `success = true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ConnectionErrorCode>,

    /// Remediation hints for the user.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ConnectionTestResult {
    /// The TLS step, if the TLS stage was reached.
    #[must_use]
    pub fn tls_step(&self) -> Option<&ConnectionTestStep> {
        self.steps.iter().find(|s| s.stage == TestStage::Tls)
    }
}

/// Aggregate outcome of a batch verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTestReport {
    /// One entry per requested server id, in input order.
    pub results: Vec<BatchTestEntry>,
    pub success_count: usize,
    pub failed_count: usize,
    pub total_time_ms: u64,
}

/// One server's slot in a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTestEntry {
    pub server_id: String,
    pub result: ConnectionTestResult,
}
