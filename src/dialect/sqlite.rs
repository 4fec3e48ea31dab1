//! SQLite hooks

use drizzle_dbml_types::Dialect;
use drizzle_dbml_types::schema::Column;

use super::{DialectHooks, quote_identifier};

pub const HOOKS: DialectHooks = DialectHooks {
    dialect: Dialect::SQLite,
    escape_name: quote_identifier,
    is_increment,
    collect_enums: None,
};

/// An integer primary key aliases the rowid and increments; explicit
/// `autoIncrement` also counts
fn is_increment(column: &Column, primary: bool) -> bool {
    column.autoincrement || (primary && column.is_integer_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_rule() {
        assert!(is_increment(&Column::new("id", "integer"), true));
        assert!(!is_increment(&Column::new("count", "integer"), false));
        assert!(!is_increment(&Column::new("id", "text"), true));
        assert!(is_increment(&Column::new("id", "integer").autoincrement(), false));
    }
}
