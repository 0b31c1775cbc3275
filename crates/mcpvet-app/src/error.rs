//! Facade error type.

use thiserror::Error;

use mcpvet_directory::DirectoryError;

/// Result type alias for facade operations.
pub type VetResult<T> = Result<T, VetError>;

/// Errors surfaced by the facade.
///
/// Connection tests and auth discovery report their failures inside
/// their result types; only directory access can fail out of band.
#[derive(Debug, Error)]
pub enum VetError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
