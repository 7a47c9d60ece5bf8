//! Error types for BookPack operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for BookPack operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors raised by the catalog builder and other I/O surfaces.
///
/// Validation findings are deliberately NOT represented here: a broken
/// package is a normal, reportable outcome of a validation run, carried
/// in the [`ValidationReport`](crate::report::ValidationReport).
#[derive(Error, Debug)]
pub enum PackError {
    #[error("books directory not found: {0}")]
    BooksDirNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
