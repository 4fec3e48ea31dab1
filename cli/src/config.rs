//! Configuration for the drizzle-dbml CLI
//!
//! Handles loading `dbml.config.toml`. Every key is optional; command-line
//! flags override whatever the file sets.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use drizzle_dbml_types::Dialect;

pub const CONFIG_FILE: &str = "dbml.config.toml";

/// Schema JSON path used when neither the config nor `--schema` names one
pub const DEFAULT_SCHEMA: &str = "schema.json";

/// Output directory used by `--split` without `--out`
pub const DEFAULT_SPLIT_DIR: &str = "dbml";

// ============================================================================
// Configuration
// ============================================================================

/// Contents of `dbml.config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dialect: Option<Dialect>,

    /// Schema JSON exported from the evaluated schema module
    #[serde(default)]
    pub schema: Option<PathBuf>,

    /// TypeScript schema file or directory for comments and relations
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Output file, or output directory with `split`
    #[serde(default)]
    pub out: Option<PathBuf>,

    #[serde(default)]
    pub relational: bool,

    #[serde(default)]
    pub split: bool,

    #[serde(default)]
    pub force: bool,
}

impl Config {
    /// Load from the default config file, or an empty config if there is none
    pub fn load() -> Result<Self, Error> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no {CONFIG_FILE} found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from a specific path, which must exist
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| Error::Parse(path.into(), e))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolved dialect, SQLite when unset
    #[inline]
    pub fn dialect(&self) -> Dialect {
        self.dialect.unwrap_or_default()
    }

    /// Resolved schema JSON path
    pub fn schema_path(&self) -> PathBuf {
        self.schema
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA))
    }
}

/// Starter config written by `drizzle-dbml init`
pub fn starter_config(dialect: Dialect) -> String {
    format!(
        r#"# drizzle-dbml configuration

dialect = "{dialect}"
schema = "{DEFAULT_SCHEMA}"
source = "src/db/schema.ts"
out = "schema.dbml"
# relational = true
# split = true
# force = true
"#
    )
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full() {
        let cfg: Config = toml::from_str(
            r#"
            dialect = "postgresql"
            schema = "out/schema.json"
            source = "src/schema"
            out = "docs/schema.dbml"
            relational = true
            split = false
            force = true
        "#,
        )
        .unwrap();
        assert_eq!(cfg.dialect(), Dialect::PostgreSQL);
        assert_eq!(cfg.schema_path(), PathBuf::from("out/schema.json"));
        assert_eq!(cfg.source, Some(PathBuf::from("src/schema")));
        assert!(cfg.relational);
        assert!(!cfg.split);
        assert!(cfg.force);
    }

    #[test]
    fn defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.dialect(), Dialect::SQLite);
        assert_eq!(cfg.schema_path(), PathBuf::from(DEFAULT_SCHEMA));
    }

    #[test]
    fn dialect_alias() {
        let cfg: Config = toml::from_str(r#"dialect = "postgres""#).unwrap();
        assert_eq!(cfg.dialect(), Dialect::PostgreSQL);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(toml::from_str::<Config>(r#"dbCredentials = "x""#).is_err());
    }

    #[test]
    fn starter_config_parses() {
        for dialect in Dialect::ALL {
            let cfg: Config = toml::from_str(&starter_config(dialect)).unwrap();
            assert_eq!(cfg.dialect(), dialect);
            assert_eq!(cfg.out, Some(PathBuf::from("schema.dbml")));
        }
    }
}
