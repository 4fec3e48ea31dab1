//! Dialect-aware type lookup

use crate::{Dialect, mysql, postgres, sqlite};

/// Map an ORM type identifier to the DBML token for `dialect`
///
/// A parameter list (`varchar(255)`) or array suffix (`integer[]`) is carried
/// over from the input after its base identifier is mapped. Identifiers the
/// table does not know, and suffixes followed by more words
/// (`timestamp(3) with time zone`), are returned unchanged.
///
/// # Examples
///
/// ```
/// use drizzle_dbml_types::{Dialect, map_type};
///
/// assert_eq!(map_type("doublePrecision", Dialect::PostgreSQL), "\"double precision\"");
/// assert_eq!(map_type("varchar(255)", Dialect::MySQL), "varchar(255)");
/// assert_eq!(map_type("citext", Dialect::PostgreSQL), "citext");
/// ```
#[must_use]
pub fn map_type(identifier: &str, dialect: Dialect) -> String {
    let lookup: fn(&str) -> Option<&'static str> = match dialect {
        Dialect::PostgreSQL => postgres::dbml_type,
        Dialect::MySQL => mysql::dbml_type,
        Dialect::SQLite => sqlite::dbml_type,
    };

    if let Some(token) = lookup(identifier) {
        return token.to_string();
    }

    let (base, suffix) = split_suffix(identifier);
    if suffix.is_empty() || !suffix.trim_end().ends_with([')', ']']) {
        return identifier.to_string();
    }

    match lookup(base) {
        Some(token) => {
            let suffix: String = suffix.chars().filter(|c| !c.is_whitespace()).collect();
            match token.strip_suffix('"') {
                Some(quoted) => format!("{quoted}{suffix}\""),
                None => format!("{token}{suffix}"),
            }
        }
        None => identifier.to_string(),
    }
}

/// Split `varchar(255)` into `("varchar", "(255)")`
fn split_suffix(identifier: &str) -> (&str, &str) {
    let end = identifier.find(['(', '[']).unwrap_or(identifier.len());
    (identifier[..end].trim_end(), &identifier[end..])
}
