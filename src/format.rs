//! DBML literal formatting

use drizzle_dbml_types::schema::DefaultValue;

fn escape_single_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Single-quoted DBML string, or a triple-quoted one when `text` spans
/// several lines
pub fn string_literal(text: &str) -> String {
    if text.contains('\n') {
        format!(
            "'''{}'''",
            text.replace('\\', "\\\\").replace("'''", "\\'''")
        )
    } else {
        format!("'{}'", escape_single_quoted(text))
    }
}

/// Right-hand side of a `default:` column setting
pub fn default_literal(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Text(text) => {
            format!("'{}'", escape_single_quoted(text).replace('\n', "\\n"))
        }
        DefaultValue::Integer(n) => n.to_string(),
        DefaultValue::Float(n) => n.to_string(),
        DefaultValue::Boolean(b) => b.to_string(),
        DefaultValue::Null => "null".to_string(),
        DefaultValue::Sql(expr) | DefaultValue::Json(expr) => {
            format!("`{}`", expr.replace('`', "\\`"))
        }
    }
}

/// Quote type tokens that contain whitespace and are not quoted yet
pub fn type_token(token: String) -> String {
    if token.starts_with('"') || !token.chars().any(char::is_whitespace) {
        token
    } else {
        format!("\"{token}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal("Users table"), "'Users table'");
        assert_eq!(string_literal("it's"), "'it\\'s'");
        assert_eq!(string_literal("a\\b"), "'a\\\\b'");
        assert_eq!(string_literal("one\ntwo"), "'''one\ntwo'''");
    }

    #[test]
    fn test_default_literal() {
        assert_eq!(default_literal(&DefaultValue::from("user")), "'user'");
        assert_eq!(default_literal(&DefaultValue::from(0)), "0");
        assert_eq!(default_literal(&DefaultValue::from(1.5)), "1.5");
        assert_eq!(default_literal(&DefaultValue::from(false)), "false");
        assert_eq!(default_literal(&DefaultValue::Null), "null");
        assert_eq!(default_literal(&DefaultValue::sql("now()")), "`now()`");
        assert_eq!(default_literal(&DefaultValue::from("")), "''");
    }

    #[test]
    fn test_type_token() {
        assert_eq!(type_token("integer".into()), "integer");
        assert_eq!(type_token("\"double precision\"".into()), "\"double precision\"");
        assert_eq!(
            type_token("timestamp (3) with time zone".into()),
            "\"timestamp (3) with time zone\""
        );
    }
}
