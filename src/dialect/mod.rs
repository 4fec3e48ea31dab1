//! Per-dialect generation hooks
//!
//! The generator engine is dialect-agnostic. Everything that differs
//! between PostgreSQL, MySQL and SQLite is carried by a [`DialectHooks`]
//! value: identifier escaping, the increment rule, and an optional extra
//! emission pass (PostgreSQL enum blocks).

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use drizzle_dbml_types::Dialect;
use drizzle_dbml_types::schema::{Column, Enum, Schema};

/// Dialect capability record consumed by [`Generator`](crate::Generator)
#[derive(Debug, Clone, Copy)]
pub struct DialectHooks {
    pub dialect: Dialect,
    /// Quote an identifier for DBML output
    pub escape_name: fn(&str) -> String,
    /// Whether a column auto-increments. The flag is the column's effective
    /// inline primary key status.
    pub is_increment: fn(&Column, bool) -> bool,
    /// Enum types to emit ahead of the tables. `None` for dialects without
    /// named enum types; such dialects render enum columns by SQL type.
    pub collect_enums: Option<fn(&Schema) -> Vec<Enum>>,
}

impl DialectHooks {
    #[must_use]
    pub const fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::PostgreSQL => postgres::HOOKS,
            Dialect::MySQL => mysql::HOOKS,
            Dialect::SQLite => sqlite::HOOKS,
        }
    }

    /// Whether enum columns render as a named enum type
    #[must_use]
    pub const fn has_enum_blocks(&self) -> bool {
        self.collect_enums.is_some()
    }
}

/// Double-quote an identifier, escaping embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\\\"ird\"");
    }

    #[test]
    fn test_for_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(DialectHooks::for_dialect(dialect).dialect, dialect);
        }
        assert!(DialectHooks::for_dialect(Dialect::PostgreSQL).has_enum_blocks());
        assert!(!DialectHooks::for_dialect(Dialect::MySQL).has_enum_blocks());
        assert!(!DialectHooks::for_dialect(Dialect::SQLite).has_enum_blocks());
    }
}
