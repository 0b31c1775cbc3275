//! Domain types for remote MCP server vetting.
//!
//! These types are pure data: no infrastructure concerns, no I/O. They
//! cross the boundary to host adapters (UI, IPC) as serde JSON.
//!
//! # Design
//!
//! - `RemoteServerDescriptor` - An immutable catalog entry
//! - `DirectoryCacheEntry` - A whole-value directory snapshot with timestamp
//! - `ConnectionTestResult` - Transient outcome of one endpoint verification
//! - `AuthDiscoveryResult` - Transient outcome of one auth-discovery walk
//! - `SecurityContext` - Derived risk view, recomputed on every call

mod auth;
mod directory;
mod security;
mod server;
mod verify;

pub use auth::{
    AuthDiscoveryResult, AuthorizationServerMetadata, DiscoveredAuthType,
    ProtectedResourceMetadata,
};
pub use directory::{
    DIRECTORY_TTL_HOURS, DirectoryCacheEntry, DirectoryCacheStatus, DirectoryOrigin, ServerFilters,
};
pub use security::{RiskLevel, SecurityContext, SecurityWarning, WarningSeverity};
pub use server::{
    AuthConfig, DeclaredAuthType, RemoteServerDescriptor, ServerSource, TransportKind,
};
pub use verify::{
    BatchTestEntry, BatchTestReport, ConnectionErrorCode, ConnectionTestResult, ConnectionTestStep,
    DiscoveredServerInfo, StepStatus, TestStage,
};
