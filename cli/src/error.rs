//! Error types for the CLI

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Error as ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error on a specific path
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output exists and `--force` was not given
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    /// Dialect name not recognized
    #[error("Unknown dialect: {0}. Valid dialects: postgresql, mysql, sqlite")]
    UnknownDialect(String),

    /// `inspect` needs a source path
    #[error("No source path: pass --source or set `source` in dbml.config.toml")]
    MissingSource,

    /// Schema JSON could not be decoded
    #[error("Invalid schema JSON in {}: {}", .path.display(), .source)]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Generation failed
    #[error(transparent)]
    Generate(#[from] drizzle_dbml::Error),

    /// JSON encoding of command output failed
    #[error("Failed to encode JSON: {0}")]
    Json(#[source] serde_json::Error),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: CliError = crate::ConfigError::NotFound(PathBuf::from("dbml.config.toml")).into();
        assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
