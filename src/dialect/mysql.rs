//! MySQL hooks

use drizzle_dbml_types::Dialect;
use drizzle_dbml_types::schema::Column;

use super::{DialectHooks, quote_identifier};

pub const HOOKS: DialectHooks = DialectHooks {
    dialect: Dialect::MySQL,
    escape_name: quote_identifier,
    is_increment,
    collect_enums: None,
};

/// `.autoincrement()` columns and `serial` (an alias for an
/// auto-incrementing unsigned bigint)
fn is_increment(column: &Column, _primary: bool) -> bool {
    column.autoincrement || column.sql_type.eq_ignore_ascii_case("serial")
}
