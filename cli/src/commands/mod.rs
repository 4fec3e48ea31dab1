//! CLI command implementations
//!
//! Each command module implements one drizzle-dbml subcommand.

pub mod generate;
pub mod init;
pub mod inspect;

use drizzle_dbml::types::Dialect;

use crate::error::CliError;

/// Parse a dialect name or alias (`postgres`, `pg`, `turso`, ...)
pub fn parse_dialect(name: &str) -> Result<Dialect, CliError> {
    Dialect::parse(name).ok_or_else(|| CliError::UnknownDialect(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect() {
        assert_eq!(parse_dialect("pg").unwrap(), Dialect::PostgreSQL);
        assert_eq!(parse_dialect("MySQL").unwrap(), Dialect::MySQL);
        assert!(matches!(
            parse_dialect("oracle"),
            Err(CliError::UnknownDialect(name)) if name == "oracle"
        ));
    }
}
