//! The vetting service facade.
//!
//! One object a host embeds to get the whole workflow: browse the
//! directory, verify connections, discover auth requirements, and
//! assess risk before connecting an assistant to a remote server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mcpvet_core::domain::{
    AuthDiscoveryResult, BatchTestReport, ConnectionTestResult, DirectoryCacheStatus,
    RemoteServerDescriptor, SecurityContext, ServerFilters, TransportKind,
};
use mcpvet_core::ports::{DnsResolverPort, HttpProbe, TlsInspectorPort};
use mcpvet_core::services::security;
use mcpvet_directory::{DirectoryStore, FetchOutcome, FileCache};
use mcpvet_probe::discovery::AuthDiscoveryEngine;
use mcpvet_probe::verifier::ConnectionVerifier;
use mcpvet_probe::{ReqwestProbe, RustlsTlsInspector, TokioDnsResolver};

use crate::config::VetConfig;
use crate::error::VetResult;

/// Facade over the directory store, the connection verifier and the
/// auth discovery engine.
///
/// Generic over the network ports; `VetService::new` wires the
/// production adapters and shares one HTTP probe between the verifier
/// and the discovery engine.
pub struct VetService<P = ReqwestProbe, D = TokioDnsResolver, T = RustlsTlsInspector>
where
    P: HttpProbe,
    D: DnsResolverPort,
    T: TlsInspectorPort,
{
    config: VetConfig,
    directory: DirectoryStore,
    verifier: ConnectionVerifier<Arc<P>, D, T>,
    discovery: AuthDiscoveryEngine<Arc<P>>,
}

impl VetService {
    /// Production service over the curated catalog and real network
    /// adapters, caching at `config.cache_path`.
    #[must_use]
    pub fn new(config: VetConfig) -> Self {
        Self::with_ports(
            config,
            ReqwestProbe::new(),
            TokioDnsResolver::new(),
            RustlsTlsInspector::new(),
        )
    }

    /// Production service with default timeouts and concurrency.
    #[must_use]
    pub fn with_defaults(cache_path: impl Into<PathBuf>) -> Self {
        Self::new(VetConfig::new(cache_path))
    }
}

impl<P, D, T> VetService<P, D, T>
where
    P: HttpProbe,
    D: DnsResolverPort,
    T: TlsInspectorPort,
{
    /// Build a service with explicit network ports.
    #[must_use]
    pub fn with_ports(config: VetConfig, probe: P, dns: D, tls: T) -> Self {
        let probe = Arc::new(probe);
        let directory = DirectoryStore::new(Box::new(FileCache::new(config.cache_path.clone())));
        let verifier = ConnectionVerifier::with_ports(Arc::clone(&probe), dns, tls);
        let discovery = AuthDiscoveryEngine::new(probe);
        Self {
            config,
            directory,
            verifier,
            discovery,
        }
    }

    // ========================================================================
    // Directory
    // ========================================================================

    /// Fetch the server directory, rebuilding on cache miss or when
    /// `force_refresh` is set.
    pub async fn fetch_directory(&self, force_refresh: bool) -> VetResult<FetchOutcome> {
        Ok(self.directory.fetch(force_refresh).await?)
    }

    /// Search the directory with AND-composed filters.
    pub async fn search_servers(
        &self,
        filters: &ServerFilters,
    ) -> VetResult<Vec<RemoteServerDescriptor>> {
        Ok(self.directory.search(filters).await?)
    }

    /// Look up one directory entry by id.
    pub async fn server_details(&self, id: &str) -> VetResult<RemoteServerDescriptor> {
        Ok(self.directory.details(id).await?)
    }

    /// Report cache state without triggering a rebuild.
    pub async fn cache_status(&self) -> DirectoryCacheStatus {
        self.directory.cache_status().await
    }

    // ========================================================================
    // Connection testing
    // ========================================================================

    /// Run the staged connection test against one directory entry.
    pub async fn test_connection(&self, id: &str) -> VetResult<ConnectionTestResult> {
        let server = self.directory.details(id).await?;
        tracing::info!(server_id = %id, endpoint = %server.endpoint, "testing connection");
        Ok(self
            .verifier
            .verify(&server.endpoint, server.transport, self.config.default_timeout)
            .await)
    }

    /// Test an arbitrary endpoint that need not be in the directory.
    pub async fn test_endpoint(
        &self,
        endpoint: &str,
        transport: TransportKind,
        timeout: Duration,
    ) -> ConnectionTestResult {
        self.verifier.verify(endpoint, transport, timeout).await
    }

    /// Test many directory entries, bounded by the configured
    /// concurrency. Unknown ids get failure entries, not errors.
    pub async fn test_all_connections(&self, ids: &[String]) -> VetResult<BatchTestReport> {
        let snapshot = self.directory.fetch(false).await?;
        Ok(self
            .verifier
            .verify_all(
                ids,
                &snapshot.servers,
                self.config.batch_concurrency,
                self.config.default_timeout,
            )
            .await)
    }

    // ========================================================================
    // Auth discovery
    // ========================================================================

    /// Discover how a directory entry wants to be authenticated.
    pub async fn discover_auth(&self, id: &str) -> VetResult<AuthDiscoveryResult> {
        let server = self.directory.details(id).await?;
        tracing::info!(server_id = %id, "discovering auth requirements");
        Ok(self.discovery.discover(&server.endpoint).await)
    }

    /// Discover auth for an arbitrary endpoint that need not be in the
    /// directory, e.g. before registering a server.
    pub async fn discover_endpoint(&self, endpoint: &str) -> AuthDiscoveryResult {
        self.discovery.discover(endpoint).await
    }

    // ========================================================================
    // Security assessment
    // ========================================================================

    /// Assess a directory entry, folding in a connection test result
    /// when the caller has one.
    pub async fn assess_server(
        &self,
        id: &str,
        connection: Option<&ConnectionTestResult>,
    ) -> VetResult<SecurityContext> {
        let server = self.directory.details(id).await?;
        Ok(security::assess(&server, connection))
    }
}
