//! Column definitions
//!
//! [`Column`] mirrors the accessor contract of an ORM column object: SQL name,
//! SQL type, nullability, default, key flags and an optional inline foreign key.

use super::{ColumnReference, DefaultValue, Enum};

#[cfg(feature = "serde")]
use crate::serde_helpers::present;

/// Column of a live table
///
/// # Examples
///
/// ```
/// use drizzle_dbml_types::schema::{Column, ColumnReference};
///
/// let id = Column::new("id", "serial").primary_key();
/// assert!(id.not_null);
///
/// let author = Column::new("author_id", "integer")
///     .not_null()
///     .references(ColumnReference::new("users", "id"));
/// assert_eq!(author.references.as_ref().map(|r| r.table.as_str()), Some("users"));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column {
    /// Column SQL name
    pub name: String,

    /// ORM type identifier or SQL type (e.g., "serial", "doublePrecision", "varchar(255)")
    pub sql_type: String,

    /// Is this column NOT NULL?
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub not_null: bool,

    /// Is this column a single-column PRIMARY KEY?
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub primary_key: bool,

    /// Is this column UNIQUE?
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub unique: bool,

    /// Explicit AUTOINCREMENT / AUTO_INCREMENT flag (MySQL, SQLite)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub autoincrement: bool,

    /// GENERATED ... AS IDENTITY column (PostgreSQL)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub identity: bool,

    /// Default value; `None` means the column declares no default
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub default: Option<DefaultValue>,

    /// Inline foreign key target
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub references: Option<ColumnReference>,

    /// Enum type backing this column, if it is enum-typed
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub enum_type: Option<Enum>,
}

impl Column {
    /// Create a nullable column with no constraints
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            primary_key: false,
            unique: false,
            autoincrement: false,
            identity: false,
            default: None,
            references: None,
            enum_type: None,
        }
    }

    /// Set NOT NULL constraint
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Set PRIMARY KEY (also sets NOT NULL)
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    /// Set UNIQUE constraint
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set AUTOINCREMENT
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Mark as an identity column (also sets NOT NULL)
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.identity = true;
        self.not_null = true;
        self
    }

    /// Set default value
    #[must_use]
    pub fn default_value(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set inline foreign key target
    #[must_use]
    pub fn references(mut self, target: ColumnReference) -> Self {
        self.references = Some(target);
        self
    }

    /// Attach the enum type backing this column
    #[must_use]
    pub fn enum_type(mut self, enum_type: Enum) -> Self {
        self.enum_type = Some(enum_type);
        self
    }

    /// Get the column name as a string slice
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the SQL type is a plain integer type
    ///
    /// Matches the integer family across dialects (`integer`, `int`,
    /// `bigint`, `smallint`, ...), ignoring case and any parameter list.
    #[must_use]
    pub fn is_integer_type(&self) -> bool {
        let base = self
            .sql_type
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        matches!(
            base.as_str(),
            "integer" | "int" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2" | "int4" | "int8"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_implies_not_null() {
        let col = Column::new("id", "integer").primary_key();
        assert!(col.primary_key);
        assert!(col.not_null);
        assert!(!col.unique);
    }

    #[test]
    fn test_falsy_default_is_present() {
        let col = Column::new("count", "integer").default_value(0);
        assert_eq!(col.default, Some(DefaultValue::Integer(0)));

        let col = Column::new("count", "integer");
        assert!(col.default.is_none());
    }

    #[test]
    fn test_integer_type_detection() {
        assert!(Column::new("a", "integer").is_integer_type());
        assert!(Column::new("a", "INT(11)").is_integer_type());
        assert!(Column::new("a", "bigint").is_integer_type());
        assert!(!Column::new("a", "serial").is_integer_type());
        assert!(!Column::new("a", "text").is_integer_type());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_null_default_differs_from_missing() {
        let col: Column =
            serde_json::from_str(r#"{"name": "bio", "sqlType": "text", "default": null}"#).unwrap();
        assert_eq!(col.default, Some(DefaultValue::Null));

        let col: Column = serde_json::from_str(r#"{"name": "bio", "sqlType": "text"}"#).unwrap();
        assert_eq!(col.default, None);
    }
}
