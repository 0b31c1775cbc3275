//! Directory store error types.

use thiserror::Error;

/// Result type alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors from directory operations.
///
/// Cache trouble is never an error (it degrades to absence); these cover
/// the cases a caller must distinguish from an empty directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Rebuilding the catalog failed and no cached snapshot was usable.
    #[error("failed to rebuild server directory: {0}")]
    RebuildFailed(String),

    /// No catalog entry with the requested id.
    #[error("server '{0}' not found in directory")]
    NotFound(String),
}
