//! Column default values

/// Default value declared on a column
///
/// A column without a default carries `None` rather than a variant here, so a
/// falsy default (`0`, `false`, `''`) is never confused with "no default".
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    /// String literal default, e.g. `.default('user')`
    Text(String),
    /// Integer literal default
    Integer(i64),
    /// Floating point literal default
    Float(f64),
    /// Boolean literal default
    Boolean(bool),
    /// Explicit `null` default
    Null,
    /// Raw SQL expression default, e.g. ``.default(sql`now()`)``
    Sql(String),
    /// Structured (object/array) default, stored as compact JSON text
    Json(String),
}

impl DefaultValue {
    /// Shorthand for a SQL expression default
    #[must_use]
    pub fn sql(expression: impl Into<String>) -> Self {
        Self::Sql(expression.into())
    }

    /// Returns `true` for `Null`
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DefaultValue;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
    use serde_json::Value;

    /// JSON shape: plain scalars map to literals, `{"sql": "..."}` is a SQL
    /// expression, any other object or array is kept as JSON.
    impl<'de> Deserialize<'de> for DefaultValue {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Value::deserialize(deserializer)?;
            Ok(match value {
                Value::Null => DefaultValue::Null,
                Value::Bool(b) => DefaultValue::Boolean(b),
                Value::String(s) => DefaultValue::Text(s),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => DefaultValue::Integer(i),
                    None => DefaultValue::Float(
                        n.as_f64()
                            .ok_or_else(|| D::Error::custom("default number out of range"))?,
                    ),
                },
                Value::Object(map) if map.len() == 1 && map.contains_key("sql") => {
                    match map.get("sql") {
                        Some(Value::String(expr)) => DefaultValue::Sql(expr.clone()),
                        _ => return Err(D::Error::custom("`sql` default must be a string")),
                    }
                }
                other => DefaultValue::Json(other.to_string()),
            })
        }
    }

    impl Serialize for DefaultValue {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let value = match self {
                DefaultValue::Text(s) => Value::String(s.clone()),
                DefaultValue::Integer(i) => Value::from(*i),
                DefaultValue::Float(f) => Value::from(*f),
                DefaultValue::Boolean(b) => Value::Bool(*b),
                DefaultValue::Null => Value::Null,
                DefaultValue::Sql(expr) => serde_json::json!({ "sql": expr }),
                DefaultValue::Json(text) => {
                    serde_json::from_str(text).map_err(serde::ser::Error::custom)?
                }
            };
            value.serialize(serializer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_literals() {
        assert_eq!(DefaultValue::from("user"), DefaultValue::Text("user".into()));
        assert_eq!(DefaultValue::from(0), DefaultValue::Integer(0));
        assert_eq!(DefaultValue::from(false), DefaultValue::Boolean(false));
        assert!(DefaultValue::Null.is_null());
        assert!(!DefaultValue::from(0).is_null());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_shapes() {
        let text: DefaultValue = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(text, DefaultValue::Text("user".into()));

        let zero: DefaultValue = serde_json::from_str("0").unwrap();
        assert_eq!(zero, DefaultValue::Integer(0));

        let float: DefaultValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(float, DefaultValue::Float(1.5));

        let sql: DefaultValue = serde_json::from_str(r#"{"sql": "now()"}"#).unwrap();
        assert_eq!(sql, DefaultValue::Sql("now()".into()));

        let json: DefaultValue = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(json, DefaultValue::Json(r#"{"theme":"dark"}"#.into()));
    }
}
