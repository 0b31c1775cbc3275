//! Batch connection verification.
//!
//! Runs the single-endpoint verifier over many directory entries in
//! fixed-size chunks so a large batch cannot open an unbounded number
//! of sockets at once. Report order always matches request order.

use futures_util::future::join_all;
use std::time::{Duration, Instant};

use mcpvet_core::domain::{
    BatchTestEntry, BatchTestReport, ConnectionErrorCode, ConnectionTestResult,
    RemoteServerDescriptor,
};
use mcpvet_core::ports::{DnsResolverPort, HttpProbe, TlsInspectorPort};

use crate::verifier::{ConnectionVerifier, suggestions_for};

/// Default number of endpoints verified concurrently.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

impl<P, D, T> ConnectionVerifier<P, D, T>
where
    P: HttpProbe,
    D: DnsResolverPort,
    T: TlsInspectorPort,
{
    /// Verify every id against a directory snapshot, at most
    /// `concurrency` endpoints in flight at a time.
    ///
    /// Ids with no matching descriptor get a synthetic failure entry
    /// instead of aborting the batch.
    pub async fn verify_all(
        &self,
        ids: &[String],
        servers: &[RemoteServerDescriptor],
        concurrency: usize,
        timeout: Duration,
    ) -> BatchTestReport {
        let started = Instant::now();
        let mut results = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(concurrency.max(1)) {
            let chunk_results =
                join_all(chunk.iter().map(|id| self.verify_entry(id, servers, timeout)));
            results.extend(chunk_results.await);
        }

        let success_count = results.iter().filter(|e| e.result.success).count();
        let failed_count = results.len() - success_count;
        tracing::info!(
            total = results.len(),
            success = success_count,
            failed = failed_count,
            "batch verification finished"
        );

        #[allow(clippy::cast_possible_truncation)]
        let total_time_ms = started.elapsed().as_millis() as u64;
        BatchTestReport {
            results,
            success_count,
            failed_count,
            total_time_ms,
        }
    }

    async fn verify_entry(
        &self,
        id: &str,
        servers: &[RemoteServerDescriptor],
        timeout: Duration,
    ) -> BatchTestEntry {
        let result = match servers.iter().find(|s| s.id == id) {
            Some(server) => self.verify(&server.endpoint, server.transport, timeout).await,
            None => unknown_server_result(id),
        };
        BatchTestEntry {
            server_id: id.to_string(),
            result,
        }
    }
}

/// Synthetic result for an id the directory snapshot does not contain.
fn unknown_server_result(id: &str) -> ConnectionTestResult {
    tracing::warn!(server_id = %id, "batch verification requested for unknown server id");
    ConnectionTestResult {
        success: false,
        latency_ms: 0,
        http_status: None,
        steps: Vec::new(),
        server_info: None,
        error_code: Some(ConnectionErrorCode::NotMcpServer),
        suggestions: suggestions_for(ConnectionErrorCode::NotMcpServer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeProbe;
    use crate::net::testing::{FakeDns, FakeTls, FakeTlsOutcome};
    use mcpvet_core::domain::{DeclaredAuthType, ServerSource, TransportKind};

    fn descriptor(id: &str, host: &str) -> RemoteServerDescriptor {
        RemoteServerDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            endpoint: format!("https://{host}/mcp"),
            transport: TransportKind::Http,
            auth_type: DeclaredAuthType::Open,
            auth_config: None,
            provider: "Test".to_string(),
            verified: true,
            category: "test".to_string(),
            tags: vec![],
            source: ServerSource::Curated,
        }
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order_and_counts() {
        let servers = vec![
            descriptor("alpha", "alpha.example"),
            descriptor("beta", "beta.example"),
            descriptor("gamma", "gamma.example"),
        ];
        let probe = FakeProbe::new()
            .with_json("alpha.example", 200, &serde_json::json!({}))
            .with_response("beta.example", 500, &[], "")
            .with_json("gamma.example", 200, &serde_json::json!({}));
        let dns = FakeDns::new()
            .with_host("alpha.example")
            .with_host("beta.example")
            .with_host("gamma.example");
        let verifier = ConnectionVerifier::with_ports(probe, dns, FakeTls::new(FakeTlsOutcome::Valid));

        let report = verifier
            .verify_all(
                &ids(&["gamma", "alpha", "beta"]),
                &servers,
                2,
                Duration::from_secs(1),
            )
            .await;

        let order: Vec<&str> = report.results.iter().map(|e| e.server_id.as_str()).collect();
        assert_eq!(order, ["gamma", "alpha", "beta"]);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.success_count + report.failed_count, 3);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_synthetic_failure() {
        let servers = vec![descriptor("alpha", "alpha.example")];
        let probe = FakeProbe::new().with_json("alpha.example", 200, &serde_json::json!({}));
        let dns = FakeDns::new().with_host("alpha.example");
        let verifier = ConnectionVerifier::with_ports(probe, dns, FakeTls::new(FakeTlsOutcome::Valid));

        let report = verifier
            .verify_all(
                &ids(&["alpha", "missing"]),
                &servers,
                5,
                Duration::from_secs(1),
            )
            .await;

        assert_eq!(report.results.len(), 2);
        let missing = &report.results[1];
        assert_eq!(missing.server_id, "missing");
        assert!(!missing.result.success);
        assert_eq!(
            missing.result.error_code,
            Some(ConnectionErrorCode::NotMcpServer)
        );
        assert!(missing.result.steps.is_empty());
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let servers = vec![descriptor("alpha", "alpha.example")];
        let probe = FakeProbe::new().with_json("alpha.example", 200, &serde_json::json!({}));
        let dns = FakeDns::new().with_host("alpha.example");
        let verifier = ConnectionVerifier::with_ports(probe, dns, FakeTls::new(FakeTlsOutcome::Valid));

        let report = verifier
            .verify_all(&ids(&["alpha"]), &servers, 0, Duration::from_secs(1))
            .await;
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.success_count, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty_report() {
        let verifier = ConnectionVerifier::with_ports(
            FakeProbe::new(),
            FakeDns::new(),
            FakeTls::new(FakeTlsOutcome::Valid),
        );
        let report = verifier
            .verify_all(&[], &[], 5, Duration::from_secs(1))
            .await;
        assert!(report.results.is_empty());
        assert_eq!(report.success_count, 0);
        assert_eq!(report.failed_count, 0);
    }
}
