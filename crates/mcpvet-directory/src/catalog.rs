//! Curated catalog of remote MCP servers.
//!
//! The seed list ships with the application. `CatalogSource` is the
//! extension point for a live registry: the store only ever calls
//! `build`, so swapping in a network-backed source does not touch cache
//! or fetch semantics.

use async_trait::async_trait;

use mcpvet_core::domain::{
    AuthConfig, DeclaredAuthType, RemoteServerDescriptor, ServerSource, TransportKind,
};

use crate::error::{DirectoryError, DirectoryResult};

/// Port for building the catalog (the directory's source of record).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn build(&self) -> DirectoryResult<Vec<RemoteServerDescriptor>>;
}

/// The shipped curated catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct CuratedSource;

#[async_trait]
impl CatalogSource for CuratedSource {
    async fn build(&self) -> DirectoryResult<Vec<RemoteServerDescriptor>> {
        Ok(curated_catalog())
    }
}

fn oauth_config(provider: &str, scopes: &[&str]) -> Option<AuthConfig> {
    Some(AuthConfig {
        provider: Some(provider.to_string()),
        header_name: None,
        scopes: scopes.iter().map(ToString::to_string).collect(),
        credential_env: None,
    })
}

/// Static seed list of well-known remote servers.
#[must_use]
pub fn curated_catalog() -> Vec<RemoteServerDescriptor> {
    vec![
        RemoteServerDescriptor {
            id: "github-mcp".to_string(),
            name: "GitHub".to_string(),
            description: "Repositories, issues, pull requests and code search".to_string(),
            endpoint: "https://api.githubcopilot.com/mcp/".to_string(),
            transport: TransportKind::Http,
            auth_type: DeclaredAuthType::Oauth,
            auth_config: oauth_config("github", &["repo", "read:org"]),
            provider: "GitHub".to_string(),
            verified: true,
            category: "development".to_string(),
            tags: vec!["git".to_string(), "code".to_string(), "issues".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "sentry-mcp".to_string(),
            name: "Sentry".to_string(),
            description: "Error monitoring, issues and performance data".to_string(),
            endpoint: "https://mcp.sentry.dev/mcp".to_string(),
            transport: TransportKind::Http,
            auth_type: DeclaredAuthType::Oauth,
            auth_config: oauth_config("sentry", &["org:read", "project:read"]),
            provider: "Sentry".to_string(),
            verified: true,
            category: "monitoring".to_string(),
            tags: vec!["errors".to_string(), "observability".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "linear-mcp".to_string(),
            name: "Linear".to_string(),
            description: "Issue tracking and project management".to_string(),
            endpoint: "https://mcp.linear.app/sse".to_string(),
            transport: TransportKind::EventStream,
            auth_type: DeclaredAuthType::Oauth,
            auth_config: oauth_config("linear", &["read", "write"]),
            provider: "Linear".to_string(),
            verified: true,
            category: "project-management".to_string(),
            tags: vec!["issues".to_string(), "planning".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "notion-mcp".to_string(),
            name: "Notion".to_string(),
            description: "Pages, databases and workspace search".to_string(),
            endpoint: "https://mcp.notion.com/mcp".to_string(),
            transport: TransportKind::Http,
            auth_type: DeclaredAuthType::Oauth,
            auth_config: oauth_config("notion", &["read_content", "update_content"]),
            provider: "Notion".to_string(),
            verified: true,
            category: "docs".to_string(),
            tags: vec!["notes".to_string(), "wiki".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "stripe-mcp".to_string(),
            name: "Stripe".to_string(),
            description: "Payments, customers and subscription data".to_string(),
            endpoint: "https://mcp.stripe.com".to_string(),
            transport: TransportKind::Http,
            auth_type: DeclaredAuthType::ApiKey,
            auth_config: Some(AuthConfig {
                provider: None,
                header_name: None,
                scopes: vec![],
                credential_env: Some("STRIPE_API_KEY".to_string()),
            }),
            provider: "Stripe".to_string(),
            verified: true,
            category: "payments".to_string(),
            tags: vec!["billing".to_string(), "invoices".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "cloudflare-docs-mcp".to_string(),
            name: "Cloudflare Docs".to_string(),
            description: "Search Cloudflare developer documentation".to_string(),
            endpoint: "https://docs.mcp.cloudflare.com/sse".to_string(),
            transport: TransportKind::EventStream,
            auth_type: DeclaredAuthType::Open,
            auth_config: None,
            provider: "Cloudflare".to_string(),
            verified: true,
            category: "docs".to_string(),
            tags: vec!["documentation".to_string(), "cdn".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "huggingface-mcp".to_string(),
            name: "Hugging Face".to_string(),
            description: "Models, datasets and Spaces on the Hub".to_string(),
            endpoint: "https://huggingface.co/mcp".to_string(),
            transport: TransportKind::Http,
            auth_type: DeclaredAuthType::Header,
            auth_config: Some(AuthConfig {
                provider: None,
                header_name: Some("Authorization".to_string()),
                scopes: vec![],
                credential_env: Some("HF_TOKEN".to_string()),
            }),
            provider: "Hugging Face".to_string(),
            verified: true,
            category: "development".to_string(),
            tags: vec!["models".to_string(), "ml".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "paypal-mcp".to_string(),
            name: "PayPal".to_string(),
            description: "Invoices, payments and transaction history".to_string(),
            endpoint: "https://mcp.paypal.com/sse".to_string(),
            transport: TransportKind::EventStream,
            auth_type: DeclaredAuthType::Oauth,
            auth_config: oauth_config("paypal", &["invoices:read", "payments:read"]),
            provider: "PayPal".to_string(),
            verified: true,
            category: "payments".to_string(),
            tags: vec!["billing".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "asana-mcp".to_string(),
            name: "Asana".to_string(),
            description: "Tasks, projects and team workload".to_string(),
            endpoint: "https://mcp.asana.com/sse".to_string(),
            transport: TransportKind::EventStream,
            auth_type: DeclaredAuthType::Oauth,
            auth_config: oauth_config("asana", &["default"]),
            provider: "Asana".to_string(),
            verified: true,
            category: "project-management".to_string(),
            tags: vec!["tasks".to_string()],
            source: ServerSource::Curated,
        },
        RemoteServerDescriptor {
            id: "deepwiki-mcp".to_string(),
            name: "DeepWiki".to_string(),
            description: "Ask questions about public GitHub repositories".to_string(),
            endpoint: "https://mcp.deepwiki.com/sse".to_string(),
            transport: TransportKind::EventStream,
            auth_type: DeclaredAuthType::Open,
            auth_config: None,
            provider: "Cognition".to_string(),
            verified: false,
            category: "development".to_string(),
            tags: vec!["documentation".to_string(), "code".to_string()],
            source: ServerSource::Community,
        },
    ]
}
