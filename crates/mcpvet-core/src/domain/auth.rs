//! Authentication discovery result types.
//!
//! The discovery engine classifies how an endpoint wants to be
//! authenticated by walking the bearer-challenge / RFC 9728 / RFC 8414
//! metadata chain. The metadata structs below keep the RFC wire field
//! names (snake_case) and ignore fields we do not use.

use serde::{Deserialize, Serialize};

/// Authentication scheme inferred from discovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveredAuthType {
    /// OAuth with dynamic client registration available.
    OauthDcr,
    /// OAuth, but a client must be registered manually.
    OauthStatic,
    /// Simple bearer/API-key scheme (no resource metadata published).
    ApiKey,
    /// No authentication required.
    Open,
    /// Discovery could not classify the endpoint.
    #[default]
    Unknown,
}

/// Protected-resource metadata (RFC 9728), fields we consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectedResourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authorization_servers: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes_supported: Vec<String>,
}

/// Authorization-server metadata (RFC 8414), fields we consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationServerMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,

    /// Present iff the server supports dynamic client registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_endpoint: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes_supported: Vec<String>,
}

/// Outcome of probing one endpoint for authentication requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthDiscoveryResult {
    pub requires_auth: bool,
    pub auth_type: DiscoveredAuthType,
    pub supports_dcr: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_metadata: Option<ProtectedResourceMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_server_metadata: Option<AuthorizationServerMetadata>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,

    /// Ordered human-readable log of every URL attempted and every
    /// outcome. The primary debugging surface of the engine.
    pub trace: Vec<String>,

    /// Free text for unexpected failures (discovery never panics).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
