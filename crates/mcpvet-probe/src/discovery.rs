//! Authentication discovery.
//!
//! Walks the standard remote-MCP auth metadata chain: probe the
//! endpoint, follow the bearer challenge to protected-resource
//! metadata (RFC 9728), then to authorization-server metadata
//! (RFC 8414), and classify the scheme from whatever the chain
//! yields. Every URL attempted and every outcome lands in the
//! result's trace; the engine itself never returns an error.

use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use mcpvet_core::domain::{
    AuthDiscoveryResult, AuthorizationServerMetadata, DiscoveredAuthType,
    ProtectedResourceMetadata,
};
use mcpvet_core::ports::HttpProbe;

/// Bound for each metadata request.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

const PROTECTED_RESOURCE_SUFFIX: &str = "/.well-known/oauth-protected-resource";
const AUTH_SERVER_SUFFIX: &str = "/.well-known/oauth-authorization-server";
const OIDC_SUFFIX: &str = "/.well-known/openid-configuration";

/// Discovers how a remote endpoint wants to be authenticated.
pub struct AuthDiscoveryEngine<P> {
    probe: P,
    timeout: Duration,
}

impl<P: HttpProbe> AuthDiscoveryEngine<P> {
    pub const fn new(probe: P) -> Self {
        Self {
            probe,
            timeout: DISCOVERY_TIMEOUT,
        }
    }

    /// Run the discovery chain against one endpoint.
    pub async fn discover(&self, endpoint: &str) -> AuthDiscoveryResult {
        let mut result = AuthDiscoveryResult::default();

        let url = match Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => {
                result.trace.push(format!("invalid endpoint URL: {e}"));
                result.error = Some(format!("invalid endpoint URL: {e}"));
                return result;
            }
        };

        // Step 1: probe the endpoint itself.
        let accept = [(
            "Accept".to_string(),
            "application/json, text/event-stream".to_string(),
        )];
        let response = match self.probe.get(&url, &accept, self.timeout).await {
            Ok(response) => {
                result
                    .trace
                    .push(format!("GET {url} -> status {}", response.status));
                response
            }
            Err(e) => {
                result.trace.push(format!("GET {url} -> {e}"));
                result.error = Some(e.to_string());
                return result;
            }
        };

        match response.status {
            200..=299 => {
                result.auth_type = DiscoveredAuthType::Open;
                result
                    .trace
                    .push("endpoint answered without a challenge; no auth required".to_string());
                return result;
            }
            401 | 403 => {
                result.requires_auth = true;
            }
            status => {
                result
                    .trace
                    .push(format!("unexpected status {status}; cannot classify"));
                result.error = Some(format!("unexpected status {status}"));
                return result;
            }
        }

        // Step 2: the challenge may point straight at the resource
        // metadata document.
        let challenge_url = response
            .header("www-authenticate")
            .and_then(extract_resource_metadata_url);
        if let Some(ref advertised) = challenge_url {
            result
                .trace
                .push(format!("challenge advertises resource metadata at {advertised}"));
        }

        // Step 3: protected-resource metadata.
        let resource_metadata = self
            .fetch_resource_metadata(&url, challenge_url, &mut result.trace)
            .await;
        let Some(resource_metadata) = resource_metadata else {
            result.auth_type = DiscoveredAuthType::ApiKey;
            result
                .trace
                .push("no resource metadata published; assuming API key or bearer token".to_string());
            return result;
        };

        result.scopes = resource_metadata.scopes_supported.clone();
        let auth_server = resource_metadata.authorization_servers.first().cloned();
        result.resource_metadata = Some(resource_metadata);

        let Some(auth_server) = auth_server else {
            result.auth_type = DiscoveredAuthType::ApiKey;
            result
                .trace
                .push("resource metadata lists no authorization servers".to_string());
            return result;
        };

        // Step 4: authorization-server metadata.
        let server_metadata = self
            .fetch_auth_server_metadata(&auth_server, &mut result.trace)
            .await;
        match server_metadata {
            Some(metadata) => {
                if metadata.registration_endpoint.is_some() {
                    result.auth_type = DiscoveredAuthType::OauthDcr;
                    result.supports_dcr = true;
                    result
                        .trace
                        .push("registration endpoint present; dynamic client registration available".to_string());
                } else {
                    result.auth_type = DiscoveredAuthType::OauthStatic;
                    result
                        .trace
                        .push("no registration endpoint; a client must be registered manually".to_string());
                }
                if result.scopes.is_empty() {
                    result.scopes = metadata.scopes_supported.clone();
                }
                result.auth_server_metadata = Some(metadata);
            }
            None => {
                result.auth_type = DiscoveredAuthType::OauthStatic;
                result
                    .trace
                    .push("authorization server metadata unavailable; assuming static OAuth client".to_string());
            }
        }

        result
    }

    async fn fetch_resource_metadata(
        &self,
        endpoint: &Url,
        challenge_url: Option<String>,
        trace: &mut Vec<String>,
    ) -> Option<ProtectedResourceMetadata> {
        let origin = origin_of(endpoint);
        let path = endpoint.path();

        let mut candidates = Vec::new();
        if let Some(advertised) = challenge_url {
            candidates.push(advertised);
        }
        // RFC 9728 inserts the well-known segment between origin and
        // resource path.
        if path != "/" && !path.is_empty() {
            candidates.push(format!("{origin}{PROTECTED_RESOURCE_SUFFIX}{path}"));
        }
        candidates.push(format!("{origin}{PROTECTED_RESOURCE_SUFFIX}"));
        candidates.dedup();

        for candidate in candidates {
            if let Some(metadata) = self.fetch_json(&candidate, trace).await {
                return Some(metadata);
            }
        }
        None
    }

    async fn fetch_auth_server_metadata(
        &self,
        auth_server: &str,
        trace: &mut Vec<String>,
    ) -> Option<AuthorizationServerMetadata> {
        let mut candidates = vec![
            format!("{}{AUTH_SERVER_SUFFIX}", auth_server.trim_end_matches('/')),
            format!("{}{OIDC_SUFFIX}", auth_server.trim_end_matches('/')),
        ];
        // Issuers with a path component also publish metadata at the
        // bare origin on some providers.
        if let Ok(url) = Url::parse(auth_server) {
            if url.path() != "/" && !url.path().is_empty() {
                let origin = origin_of(&url);
                candidates.push(format!("{origin}{AUTH_SERVER_SUFFIX}"));
                candidates.push(format!("{origin}{OIDC_SUFFIX}"));
            }
        }
        candidates.dedup();

        for candidate in candidates {
            if let Some(metadata) = self.fetch_json(&candidate, trace).await {
                return Some(metadata);
            }
        }
        None
    }

    /// GET a metadata document, tracing the attempt. Only a 2xx status
    /// with a parseable JSON body counts.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url_str: &str,
        trace: &mut Vec<String>,
    ) -> Option<T> {
        let Ok(url) = Url::parse(url_str) else {
            trace.push(format!("skipping malformed metadata URL {url_str}"));
            return None;
        };

        let headers = [("Accept".to_string(), "application/json".to_string())];
        match self.probe.get(&url, &headers, self.timeout).await {
            Ok(response) => {
                trace.push(format!("GET {url} -> status {}", response.status));
                if !response.is_success() {
                    return None;
                }
                match response.json::<T>() {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        trace.push(format!("metadata at {url} is not valid JSON: {e}"));
                        None
                    }
                }
            }
            Err(e) => {
                trace.push(format!("GET {url} -> {e}"));
                None
            }
        }
    }
}

/// Pull the quoted `resource_metadata` parameter out of a bearer
/// challenge, if present.
fn extract_resource_metadata_url(challenge: &str) -> Option<String> {
    let start = challenge.find("resource_metadata=")? + "resource_metadata=".len();
    let rest = &challenge[start..];
    let rest = rest.strip_prefix('"').unwrap_or(rest);
    let end = rest
        .find('"')
        .or_else(|| rest.find(','))
        .unwrap_or(rest.len());
    let value = rest[..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}
