//! Remote server catalog entry types.
//!
//! These types are shared between the Rust backend and the TypeScript
//! frontend of the console, hence the camelCase serde renames.

use serde::{Deserialize, Serialize};

/// Transport a remote MCP server speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    /// Plain streamable HTTP endpoint.
    #[default]
    Http,
    /// Server-sent events endpoint.
    EventStream,
}

/// Authentication scheme a server declares in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclaredAuthType {
    /// OAuth 2.x flow against the provider's authorization server.
    Oauth,
    /// Static API key sent as a bearer token.
    ApiKey,
    /// Credential sent in a custom request header.
    Header,
    /// No authentication required.
    #[default]
    Open,
}

/// Where a catalog entry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerSource {
    /// Shipped with the application, reviewed by maintainers.
    #[default]
    Curated,
    /// Fetched from a live registry.
    Live,
    /// Submitted by the community, not reviewed.
    Community,
}

/// Optional authentication details for a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    /// OAuth provider name (e.g. "github").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Header name for header-based auth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,

    /// OAuth scopes the server requests.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,

    /// Suggested environment variable holding the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_env: Option<String>,
}

/// One entry in the remote server directory.
///
/// Descriptors are immutable: a catalog refresh replaces the whole list,
/// entries are never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteServerDescriptor {
    /// Unique, stable identifier (e.g. "github-mcp").
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short human-readable description.
    pub description: String,

    /// Endpoint URL the assistant would connect to.
    pub endpoint: String,

    /// Transport the endpoint speaks.
    pub transport: TransportKind,

    /// Authentication scheme declared by the catalog.
    pub auth_type: DeclaredAuthType,

    /// Optional authentication details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<AuthConfig>,

    /// Provider or organization operating the server.
    pub provider: String,

    /// Whether the provider has been verified by maintainers.
    pub verified: bool,

    /// Category slug (e.g. "development", "payments").
    pub category: String,

    /// Free-text tags for search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Where this entry came from.
    pub source: ServerSource,
}

impl RemoteServerDescriptor {
    /// Scopes requested by this server, if any were declared.
    #[must_use]
    pub fn requested_scopes(&self) -> &[String] {
        self.auth_config.as_ref().map_or(&[], |c| &c.scopes)
    }
}
