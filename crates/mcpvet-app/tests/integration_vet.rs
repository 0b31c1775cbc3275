//! End-to-end tests for the vetting facade over fake network ports.

use std::path::PathBuf;
use std::time::Duration;

use mcpvet_app::{VetConfig, VetService, should_show_dialog, warnings};
use mcpvet_core::domain::{
    ConnectionErrorCode, DirectoryOrigin, DiscoveredAuthType, RiskLevel, ServerFilters, StepStatus,
    WarningSeverity,
};
use mcpvet_app::VetError;
use mcpvet_directory::DirectoryError;
use mcpvet_probe::testing::{FakeDns, FakeProbe, FakeTls, FakeTlsOutcome};
use serde_json::json;

fn cache_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("directory.json")
}

fn service(
    dir: &tempfile::TempDir,
    probe: FakeProbe,
    dns: FakeDns,
) -> VetService<FakeProbe, FakeDns, FakeTls> {
    let config = VetConfig::new(cache_path(dir)).with_timeout(Duration::from_secs(2));
    VetService::with_ports(config, probe, dns, FakeTls::new(FakeTlsOutcome::Valid))
}

#[tokio::test]
async fn test_directory_fetch_live_then_cached() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, FakeProbe::new(), FakeDns::new());

    let first = service.fetch_directory(false).await.unwrap();
    assert_eq!(first.origin, DirectoryOrigin::Live);
    assert!(!first.servers.is_empty());

    let second = service.fetch_directory(false).await.unwrap();
    assert_eq!(second.origin, DirectoryOrigin::Cache);
    assert!(!second.stale);

    let status = service.cache_status().await;
    assert!(status.is_cached);
    assert!(!status.is_stale);
    assert_eq!(status.server_count, first.servers.len());
}

#[tokio::test]
async fn test_durable_cache_survives_service_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let service = service(&dir, FakeProbe::new(), FakeDns::new());
        service.fetch_directory(false).await.unwrap();
    }

    // A fresh service over the same cache file sees the snapshot
    // without rebuilding.
    let service = service(&dir, FakeProbe::new(), FakeDns::new());
    let status = service.cache_status().await;
    assert!(status.is_cached);

    let outcome = service.fetch_directory(false).await.unwrap();
    assert_eq!(outcome.origin, DirectoryOrigin::Cache);
}

#[tokio::test]
async fn test_search_and_details() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, FakeProbe::new(), FakeDns::new());

    let filters = ServerFilters {
        category: Some("payments".to_string()),
        ..Default::default()
    };
    let hits = service.search_servers(&filters).await.unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|s| s.category == "payments"));

    let github = service.server_details("github-mcp").await.unwrap();
    assert_eq!(github.provider, "GitHub");

    let err = service.server_details("no-such-server").await.unwrap_err();
    assert!(matches!(
        err,
        VetError::Directory(DirectoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_connection_test_and_low_risk_assessment() {
    let dir = tempfile::tempdir().unwrap();
    let probe = FakeProbe::new().with_json(
        "api.githubcopilot.com",
        200,
        &json!({"capabilities": {"tools": {}}, "tools": [1, 2]}),
    );
    let dns = FakeDns::new().with_host("api.githubcopilot.com");
    let service = service(&dir, probe, dns);

    let result = service.test_connection("github-mcp").await.unwrap();
    assert!(result.success);
    assert_eq!(result.steps.len(), 4);
    assert!(result.steps.iter().all(|s| s.status == StepStatus::Success));
    assert_eq!(result.server_info.as_ref().unwrap().tool_count, Some(2));

    let context = service
        .assess_server("github-mcp", Some(&result))
        .await
        .unwrap();
    assert_eq!(context.risk_level, RiskLevel::Low);
    assert!(context.risk_factors.is_empty());
    assert!(!should_show_dialog(&context));
    assert!(warnings(&context).is_empty());
}

#[tokio::test]
async fn test_auth_challenge_then_discovery_chain() {
    let dir = tempfile::tempdir().unwrap();
    // Metadata patterns first: the endpoint host appears in every
    // well-known URL too.
    let probe = FakeProbe::new()
        .with_json(
            "oauth-protected-resource",
            200,
            &json!({
                "resource": "https://api.githubcopilot.com/mcp/",
                "authorization_servers": ["https://auth.github.example"],
                "scopes_supported": ["mcp.read"]
            }),
        )
        .with_json(
            "auth.github.example/.well-known/oauth-authorization-server",
            200,
            &json!({
                "issuer": "https://auth.github.example",
                "registration_endpoint": "https://auth.github.example/register"
            }),
        )
        .with_response(
            "api.githubcopilot.com",
            401,
            &[("WWW-Authenticate", "Bearer realm=\"mcp\"")],
            "",
        );
    let dns = FakeDns::new().with_host("api.githubcopilot.com");
    let service = service(&dir, probe, dns);

    // 401 proves reachability; the test stays green with a marker.
    let result = service.test_connection("github-mcp").await.unwrap();
    assert!(result.success);
    assert_eq!(result.error_code, Some(ConnectionErrorCode::AuthRequired));

    let auth = service.discover_auth("github-mcp").await.unwrap();
    assert!(auth.requires_auth);
    assert_eq!(auth.auth_type, DiscoveredAuthType::OauthDcr);
    assert!(auth.supports_dcr);
    assert_eq!(auth.scopes, ["mcp.read"]);
    assert!(auth.trace.len() >= 2);
}

#[tokio::test]
async fn test_discovery_works_for_unlisted_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let probe = FakeProbe::new().with_response("mcp.unlisted.example", 401, &[], "");
    let dns = FakeDns::new();
    let service = service(&dir, probe, dns);

    // Not in the catalog; discovery must still run against the raw URL.
    let auth = service
        .discover_endpoint("https://mcp.unlisted.example/mcp")
        .await;
    assert!(auth.requires_auth);
    assert_eq!(auth.auth_type, DiscoveredAuthType::ApiKey);
}

#[tokio::test]
async fn test_community_server_is_high_risk_with_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, FakeProbe::new(), FakeDns::new());

    let context = service.assess_server("deepwiki-mcp", None).await.unwrap();
    assert_eq!(context.risk_level, RiskLevel::High);
    assert!(
        context
            .risk_factors
            .iter()
            .any(|f| f.contains("community"))
    );
    assert!(should_show_dialog(&context));

    let warnings = warnings(&context);
    assert_eq!(warnings[0].severity, WarningSeverity::Critical);
}

#[tokio::test]
async fn test_batch_preserves_order_and_flags_unknown_ids() {
    let dir = tempfile::tempdir().unwrap();
    let probe = FakeProbe::new()
        .with_json("api.githubcopilot.com", 200, &json!({}))
        .with_response("mcp.stripe.com", 401, &[], "");
    let dns = FakeDns::new()
        .with_host("api.githubcopilot.com")
        .with_host("mcp.stripe.com");
    let service = service(&dir, probe, dns);

    let ids = vec![
        "github-mcp".to_string(),
        "nope-mcp".to_string(),
        "stripe-mcp".to_string(),
    ];
    let report = service.test_all_connections(&ids).await.unwrap();

    let order: Vec<&str> = report
        .results
        .iter()
        .map(|e| e.server_id.as_str())
        .collect();
    assert_eq!(order, ["github-mcp", "nope-mcp", "stripe-mcp"]);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failed_count, 1);
    assert_eq!(
        report.results[1].result.error_code,
        Some(ConnectionErrorCode::NotMcpServer)
    );
}

#[tokio::test]
async fn test_tls_warning_feeds_risk_assessment() {
    let dir = tempfile::tempdir().unwrap();
    let probe = FakeProbe::new().with_json("mcp.sentry.dev", 200, &json!({}));
    let dns = FakeDns::new().with_host("mcp.sentry.dev");
    let config = VetConfig::new(cache_path(&dir)).with_timeout(Duration::from_secs(2));
    let service = VetService::with_ports(
        config,
        probe,
        dns,
        FakeTls::new(FakeTlsOutcome::HandshakeFailure),
    );

    let result = service.test_connection("sentry-mcp").await.unwrap();
    assert!(result.success, "TLS problems alone must not fail the test");

    let context = service
        .assess_server("sentry-mcp", Some(&result))
        .await
        .unwrap();
    assert!(!context.tls_valid);
    assert!(
        context
            .risk_factors
            .iter()
            .any(|f| f.contains("TLS"))
    );
    assert_ne!(context.risk_level, RiskLevel::Low);
}
