//! Error types for DBML generation

use std::path::PathBuf;

use drizzle_dbml_parser::ExtractError;
use thiserror::Error;

/// Result type for generation
pub type Result<T> = std::result::Result<T, Error>;

/// Generation failure
///
/// Rendering itself cannot fail; only reading schema sources and writing
/// the output file touch the filesystem.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] ExtractError),

    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
