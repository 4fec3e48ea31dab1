//! PostgreSQL type mapping
//!
//! Maps `pg-core` column builder identifiers (and the SQL spellings the ORM
//! reports for them) to the tokens DBML expects.

/// ORM type identifier -> DBML type token
///
/// Multi-word tokens are stored quoted, the way DBML requires them.
pub const TYPE_MAP: &[(&str, &str)] = &[
    ("integer", "integer"),
    ("smallint", "smallint"),
    ("bigint", "bigint"),
    ("serial", "serial"),
    ("smallserial", "smallserial"),
    ("bigserial", "bigserial"),
    ("boolean", "boolean"),
    ("text", "text"),
    ("varchar", "varchar"),
    ("char", "char"),
    ("numeric", "numeric"),
    ("decimal", "decimal"),
    ("real", "real"),
    ("doublePrecision", "\"double precision\""),
    ("double precision", "\"double precision\""),
    ("json", "json"),
    ("jsonb", "jsonb"),
    ("uuid", "uuid"),
    ("date", "date"),
    ("time", "time"),
    ("timestamp", "timestamp"),
    ("timestamptz", "timestamptz"),
    ("timestamp with time zone", "\"timestamp with time zone\""),
    ("timestamp without time zone", "\"timestamp without time zone\""),
    ("time with time zone", "\"time with time zone\""),
    ("time without time zone", "\"time without time zone\""),
    ("interval", "interval"),
    ("inet", "inet"),
    ("cidr", "cidr"),
    ("macaddr", "macaddr"),
    ("macaddr8", "macaddr8"),
    ("point", "point"),
    ("line", "line"),
    ("geometry", "geometry"),
    ("bit", "bit"),
    ("vector", "vector"),
    ("halfvec", "halfvec"),
    ("sparsevec", "sparsevec"),
    ("bytea", "bytea"),
];

/// Look up the DBML token for a PostgreSQL type identifier
#[must_use]
pub fn dbml_type(identifier: &str) -> Option<&'static str> {
    TYPE_MAP
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, token)| *token)
}

/// Increment rule: serial family types and identity columns
#[must_use]
pub fn is_serial_type(sql_type: &str) -> bool {
    sql_type.to_ascii_lowercase().contains("serial")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(dbml_type("doublePrecision"), Some("\"double precision\""));
        assert_eq!(dbml_type("serial"), Some("serial"));
        assert_eq!(dbml_type("jsonb"), Some("jsonb"));
        assert_eq!(dbml_type("nope"), None);
    }

    #[test]
    fn test_serial_detection() {
        assert!(is_serial_type("serial"));
        assert!(is_serial_type("bigserial"));
        assert!(is_serial_type("SMALLSERIAL"));
        assert!(!is_serial_type("integer"));
    }
}
