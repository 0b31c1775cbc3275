//! Security assessment view types.
//!
//! A `SecurityContext` is derived from exactly one descriptor and at most
//! one connection result. It carries no identity of its own and is
//! recomputed on every call: TLS and auth facts can change between calls,
//! so risk is deliberately never cached.

use serde::{Deserialize, Serialize};

/// Risk classification for connecting to a server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// Rank for monotonicity comparisons (Unknown sorts below Low).
    #[must_use]
    pub const fn severity_rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Derived security view over one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    pub verified_provider: bool,
    pub official_source: bool,
    pub tls_valid: bool,
    pub risk_level: RiskLevel,

    /// Ordered factor strings, in detection order.
    pub risk_factors: Vec<String>,

    pub requested_scopes: Vec<String>,

    /// Human-readable description of what the server can access.
    pub data_access_summary: String,
}

/// Severity of a user-facing warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
    Critical,
}

/// One user-facing warning derived from the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityWarning {
    pub severity: WarningSeverity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}
