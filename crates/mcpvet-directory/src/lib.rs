//! Remote server directory for mcpvet.
//!
//! Holds the curated catalog of remote MCP servers and a two-tier
//! (in-process + file-backed) TTL cache over it.

mod cache;
mod catalog;
mod error;
mod store;

pub use cache::{FileCache, MemoryCache};
pub use catalog::{CatalogSource, CuratedSource, curated_catalog};
pub use error::{DirectoryError, DirectoryResult};
pub use store::{DirectoryStore, FetchOutcome};
