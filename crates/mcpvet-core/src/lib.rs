//! Core domain types, port definitions, and pure services for mcpvet.
//!
//! This crate has no network or filesystem dependencies. Adapters for
//! the ports live in `mcpvet-directory` (cache) and `mcpvet-probe`
//! (HTTP, DNS, TLS); `mcpvet-app` wires everything together for hosts.

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    AuthConfig, AuthDiscoveryResult, AuthorizationServerMetadata, BatchTestEntry, BatchTestReport,
    ConnectionErrorCode, ConnectionTestResult, ConnectionTestStep, DIRECTORY_TTL_HOURS,
    DeclaredAuthType, DirectoryCacheEntry, DirectoryCacheStatus, DirectoryOrigin,
    DiscoveredAuthType, DiscoveredServerInfo, ProtectedResourceMetadata, RemoteServerDescriptor,
    RiskLevel, SecurityContext, SecurityWarning, ServerFilters, ServerSource, StepStatus,
    TestStage, TransportKind, WarningSeverity,
};
pub use ports::{
    Clock, DirectoryCache, DnsError, DnsResolverPort, HttpProbe, ProbeError, ProbeResponse,
    ProbeResult, SystemClock, TlsCertificateInfo, TlsError, TlsInspectorPort,
};
