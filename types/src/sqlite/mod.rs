//! SQLite type mapping
//!
//! SQLite has five storage classes; the `sqlite-core` builders map onto them
//! one to one.

/// ORM type identifier -> DBML type token
pub const TYPE_MAP: &[(&str, &str)] = &[
    ("integer", "integer"),
    ("int", "integer"),
    ("real", "real"),
    ("text", "text"),
    ("blob", "blob"),
    ("numeric", "numeric"),
];

/// Look up the DBML token for a SQLite type identifier
#[must_use]
pub fn dbml_type(identifier: &str) -> Option<&'static str> {
    TYPE_MAP
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, token)| *token)
}
