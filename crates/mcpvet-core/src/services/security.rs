//! Security assessment of remote server catalog entries.
//!
//! Pure functions: same inputs, same output, no caching. Risk is
//! recomputed on every call because TLS and auth facts can change
//! between calls.

use crate::domain::{
    ConnectionTestResult, DeclaredAuthType, RemoteServerDescriptor, RiskLevel, SecurityContext,
    SecurityWarning, ServerSource, StepStatus, WarningSeverity,
};

/// Scope substrings that indicate write/administrative access.
const SENSITIVE_SCOPE_WORDS: &[&str] = &[
    "write", "delete", "admin", "manage", "full", "all", "workflow", "execute",
];

/// Providers whose remote servers are considered well-known.
const KNOWN_PROVIDERS: &[&str] = &[
    "GitHub",
    "Sentry",
    "Linear",
    "Notion",
    "Stripe",
    "Cloudflare",
    "Hugging Face",
    "Anthropic",
    "Atlassian",
    "PayPal",
    "Intercom",
    "Square",
    "Asana",
    "Zapier",
];

const FACTOR_UNVERIFIED: &str = "unverified provider";
const FACTOR_COMMUNITY: &str = "community-submitted server";
const FACTOR_OPEN_ACCESS: &str = "open access (no authentication)";
const FACTOR_UNKNOWN_PROVIDER: &str = "unknown provider";
const FACTOR_TLS_ISSUE: &str = "TLS certificate issue";

/// Derive a security view from a catalog entry and an optional
/// connection test result.
#[must_use]
pub fn assess(
    server: &RemoteServerDescriptor,
    connection: Option<&ConnectionTestResult>,
) -> SecurityContext {
    let tls_valid = connection.is_none_or(|result| {
        result
            .tls_step()
            .is_none_or(|step| step.status == StepStatus::Success)
    });

    let known_provider = KNOWN_PROVIDERS
        .iter()
        .any(|p| p.eq_ignore_ascii_case(&server.provider));

    let sensitive_scopes: Vec<&String> = server
        .requested_scopes()
        .iter()
        .filter(|scope| {
            let lower = scope.to_lowercase();
            SENSITIVE_SCOPE_WORDS.iter().any(|word| lower.contains(word))
        })
        .collect();

    // Factor order is fixed; the UI renders these verbatim.
    let mut risk_factors = Vec::new();
    if !server.verified {
        risk_factors.push(FACTOR_UNVERIFIED.to_string());
    }
    if server.source == ServerSource::Community {
        risk_factors.push(FACTOR_COMMUNITY.to_string());
    }
    if server.auth_type == DeclaredAuthType::Open {
        risk_factors.push(FACTOR_OPEN_ACCESS.to_string());
    }
    if !sensitive_scopes.is_empty() {
        let names: Vec<&str> = sensitive_scopes.iter().map(|s| s.as_str()).collect();
        risk_factors.push(format!("sensitive scopes requested: {}", names.join(", ")));
    }
    if !known_provider {
        risk_factors.push(FACTOR_UNKNOWN_PROVIDER.to_string());
    }
    if !tls_valid {
        risk_factors.push(FACTOR_TLS_ISSUE.to_string());
    }

    let risk_level = derive_risk_level(server, &risk_factors);

    SecurityContext {
        verified_provider: server.verified,
        official_source: server.source == ServerSource::Curated,
        tls_valid,
        risk_level,
        risk_factors,
        requested_scopes: server.requested_scopes().to_vec(),
        data_access_summary: data_access_summary(server),
    }
}

/// Risk-level policy table, first match wins.
///
/// The double-weighted subset (TLS issue, unknown provider,
/// community-submitted) escalates to high on two hits even when the
/// total factor count stays below three. Kept as a table the product
/// team can tune; callers must not assume anything beyond monotonicity.
fn derive_risk_level(server: &RemoteServerDescriptor, factors: &[String]) -> RiskLevel {
    let weighted_hits = factors
        .iter()
        .filter(|f| {
            f.as_str() == FACTOR_TLS_ISSUE
                || f.as_str() == FACTOR_UNKNOWN_PROVIDER
                || f.as_str() == FACTOR_COMMUNITY
        })
        .count();

    if weighted_hits >= 2 {
        RiskLevel::High
    } else if factors.len() >= 3 {
        RiskLevel::High
    } else if !factors.is_empty() {
        RiskLevel::Medium
    } else if server.verified && server.source == ServerSource::Curated {
        RiskLevel::Low
    } else {
        RiskLevel::Unknown
    }
}

/// Human-readable sentence for the consent dialog.
fn data_access_summary(server: &RemoteServerDescriptor) -> String {
    let scopes = server.requested_scopes();
    match server.auth_type {
        DeclaredAuthType::Open => format!(
            "{} is reachable without authentication; anything it exposes is available to the assistant.",
            server.name
        ),
        _ if scopes.is_empty() => format!(
            "{} will act with whatever access the supplied credential grants.",
            server.name
        ),
        _ => format!(
            "{} requests the following scopes: {}.",
            server.name,
            scopes.join(", ")
        ),
    }
}

/// User-facing warnings for a derived context.
#[must_use]
pub fn warnings(context: &SecurityContext) -> Vec<SecurityWarning> {
    let mut warnings = Vec::new();

    if context.risk_level == RiskLevel::High {
        warnings.push(SecurityWarning {
            severity: WarningSeverity::Critical,
            title: "High risk server".to_string(),
            description: format!(
                "Multiple risk factors detected: {}.",
                context.risk_factors.join("; ")
            ),
            recommendation: "Do not connect unless you trust this server's operator.".to_string(),
        });
    }

    if !context.tls_valid {
        warnings.push(SecurityWarning {
            severity: WarningSeverity::Critical,
            title: "TLS certificate problem".to_string(),
            description: "The server's TLS certificate is missing, expired, or untrusted."
                .to_string(),
            recommendation: "Verify the endpoint URL and the operator's TLS setup before connecting."
                .to_string(),
        });
    }

    for factor in &context.risk_factors {
        let (severity, title, recommendation) = match factor.as_str() {
            FACTOR_UNVERIFIED => (
                WarningSeverity::Warning,
                "Unverified provider",
                "Check the provider's documentation for this endpoint.",
            ),
            FACTOR_COMMUNITY => (
                WarningSeverity::Warning,
                "Community-submitted server",
                "Community entries are not reviewed; connect at your own risk.",
            ),
            FACTOR_OPEN_ACCESS => (
                WarningSeverity::Info,
                "No authentication",
                "Anyone can reach this server; avoid sending sensitive data.",
            ),
            FACTOR_UNKNOWN_PROVIDER => (
                WarningSeverity::Info,
                "Unknown provider",
                "This provider is not on the well-known list.",
            ),
            FACTOR_TLS_ISSUE => continue, // already covered by the critical TLS warning
            _ => (
                WarningSeverity::Warning,
                "Sensitive scopes requested",
                "Review the requested scopes before granting access.",
            ),
        };
        warnings.push(SecurityWarning {
            severity,
            title: title.to_string(),
            description: factor.clone(),
            recommendation: recommendation.to_string(),
        });
    }

    warnings
}

/// Whether the host should interrupt the user with a disclosure dialog.
///
/// A technically low-risk server still warrants a one-time disclosure
/// if any factor fired.
#[must_use]
pub fn should_show_dialog(context: &SecurityContext) -> bool {
    context.risk_level != RiskLevel::Low || !context.risk_factors.is_empty()
}
