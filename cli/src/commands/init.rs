//! Init command
//!
//! Writes a starter `dbml.config.toml` in the current directory.

use std::path::Path;

use drizzle_dbml::types::Dialect;

use crate::config::{CONFIG_FILE, starter_config};
use crate::error::CliError;
use crate::output;

pub fn run(dialect: &str) -> Result<(), CliError> {
    let dialect = super::parse_dialect(dialect)?;
    write(Path::new(CONFIG_FILE), dialect)?;

    println!("{}", output::success(&format!("Created {CONFIG_FILE}")));
    println!();
    println!("{}", output::heading("Next steps:"));
    println!("  1. Export your evaluated schema module to schema.json");
    println!("  2. Point `source` at your TypeScript schema files");
    println!("  3. Run {}", output::heading("drizzle-dbml generate"));
    Ok(())
}

/// Write the starter config to `path`, refusing to replace an existing file
pub fn write(path: &Path, dialect: Dialect) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::OutputExists(path.to_path_buf()));
    }
    std::fs::write(path, starter_config(dialect)).map_err(CliError::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_refuses_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        write(&path, Dialect::MySQL).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("dialect = \"mysql\""));
        assert!(matches!(
            write(&path, Dialect::SQLite),
            Err(CliError::OutputExists(_))
        ));
    }
}
