//! Application facade for vetting remote MCP servers.
//!
//! Hosts embed [`VetService`] and get the full workflow: directory
//! browsing with a 24-hour two-tier cache, staged connection
//! verification, OAuth metadata discovery, and risk assessment with
//! user-facing warnings.

mod config;
mod error;
mod service;

pub use config::VetConfig;
pub use error::{VetError, VetResult};
pub use service::VetService;

// Pure assessment helpers, re-exported so hosts need not depend on
// mcpvet-core directly.
pub use mcpvet_core::services::security::{assess, should_show_dialog, warnings};
