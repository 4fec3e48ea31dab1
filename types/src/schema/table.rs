//! Table definitions

use super::{Column, ForeignKey, Index, PrimaryKey};

#[cfg(feature = "serde")]
use crate::serde_helpers::{ordered_map, serialize_ordered_map};

/// Live table definition
///
/// Columns are keyed by the property name they were declared under in the
/// schema source (`authorId: integer('author_id')` is keyed `authorId`), and
/// keep their declaration order.
///
/// # Examples
///
/// ```
/// use drizzle_dbml_types::schema::{Column, PrimaryKey, Table};
///
/// let members = Table::new("members")
///     .column("userId", Column::new("user_id", "integer").not_null())
///     .column("groupId", Column::new("group_id", "integer").not_null())
///     .primary_key(PrimaryKey::new(["user_id", "group_id"]));
///
/// assert_eq!(members.column_by_key("userId").map(|c| c.name()), Some("user_id"));
/// assert!(members.has_composite_primary_key());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Table {
    /// Table SQL name
    pub name: String,

    /// Database schema (`pgSchema`), if not the default one
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub schema: Option<String>,

    /// Columns keyed by property name, in declaration order
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "ordered_map",
            serialize_with = "serialize_ordered_map"
        )
    )]
    pub columns: Vec<(String, Column)>,

    /// Indexes and table-level unique constraints
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub indexes: Vec<Index>,

    /// Table-level primary key
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub primary_key: Option<PrimaryKey>,

    /// Table-level foreign keys
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Create an empty table
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            indexes: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
        }
    }

    /// Set the database schema
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a column under `key`, replacing any column already declared there
    #[must_use]
    pub fn column(mut self, key: impl Into<String>, column: Column) -> Self {
        let key = key.into();
        match self.columns.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((key, column)),
        }
        self
    }

    /// Add an index
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Set the table-level primary key
    #[must_use]
    pub fn primary_key(mut self, pk: PrimaryKey) -> Self {
        self.primary_key = Some(pk);
        self
    }

    /// Add a table-level foreign key
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Get the table name as a string slice
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate columns in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|(_, c)| c)
    }

    /// Look up a column by its property key
    #[must_use]
    pub fn column_by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Look up a column by its SQL name
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns().find(|c| c.name == name)
    }

    /// Property key a column was declared under
    #[must_use]
    pub fn key_of(&self, column: &Column) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, c)| c.name == column.name)
            .map(|(k, _)| k.as_str())
    }

    /// Returns `true` if the table-level primary key spans several columns
    #[must_use]
    pub fn has_composite_primary_key(&self) -> bool {
        self.primary_key.as_ref().is_some_and(PrimaryKey::is_composite)
    }
}
