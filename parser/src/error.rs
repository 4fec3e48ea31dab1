//! Error types for source extraction

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read schema sources
///
/// Shape mismatches in the parsed source are never errors; only the
/// filesystem can make extraction fail.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid source pattern '{0}': {1}")]
    Pattern(String, #[source] glob::PatternError),
}

/// Lexing failure that makes a whole file unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub message: &'static str,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    /// Build an error for byte `offset` of `source`
    pub(crate) fn at(message: &'static str, source: &str, offset: usize) -> Self {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        Self {
            message,
            line,
            column,
        }
    }
}
