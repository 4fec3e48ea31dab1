//! MySQL type mapping
//!
//! Maps `mysql-core` column builder identifiers to DBML type tokens.

/// ORM type identifier -> DBML type token
pub const TYPE_MAP: &[(&str, &str)] = &[
    ("int", "int"),
    ("tinyint", "tinyint"),
    ("smallint", "smallint"),
    ("mediumint", "mediumint"),
    ("bigint", "bigint"),
    ("serial", "serial"),
    ("real", "real"),
    ("double", "double"),
    ("float", "float"),
    ("decimal", "decimal"),
    ("boolean", "boolean"),
    ("binary", "binary"),
    ("varbinary", "varbinary"),
    ("char", "char"),
    ("varchar", "varchar"),
    ("text", "text"),
    ("tinytext", "tinytext"),
    ("mediumtext", "mediumtext"),
    ("longtext", "longtext"),
    ("date", "date"),
    ("datetime", "datetime"),
    ("time", "time"),
    ("timestamp", "timestamp"),
    ("year", "year"),
    ("json", "json"),
];

/// Look up the DBML token for a MySQL type identifier
#[must_use]
pub fn dbml_type(identifier: &str) -> Option<&'static str> {
    TYPE_MAP
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, token)| *token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(dbml_type("int"), Some("int"));
        assert_eq!(dbml_type("longtext"), Some("longtext"));
        assert_eq!(dbml_type("doublePrecision"), None);
    }
}
