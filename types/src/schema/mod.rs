//! Live schema model
//!
//! These types stand in for the objects an ORM schema module exports once it
//! has been evaluated: a mapping from export name to table, relations or enum.
//! The generator only reads them.
//!
//! - [`Schema`] - ordered export name -> [`Entity`] mapping
//! - [`Table`], [`Column`] - table and column accessors
//! - [`Index`], [`PrimaryKey`], [`ForeignKey`], [`ColumnReference`] - constraints
//! - [`Enum`] - enum types
//! - [`DefaultValue`] - column defaults

mod column;
mod default;
mod enum_type;
mod foreign_key;
mod index;
mod table;

pub use column::Column;
pub use default::DefaultValue;
pub use enum_type::Enum;
pub use foreign_key::{ColumnReference, ForeignKey, ReferentialAction};
pub use index::{Index, PrimaryKey};
pub use table::Table;

/// Marker for a `relations(table, ...)` export
///
/// The live relations object carries no field-level information the
/// generator can use; relation refs come from static source parsing instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationsRef {
    /// Export name of the table the relations are declared for
    pub table: String,
}

/// A single export of the schema module
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Entity {
    Table(Table),
    Relations(RelationsRef),
    Enum(Enum),
}

impl Entity {
    /// The table, if this export exposes a column collection
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Entity::Table(table) => Some(table),
            _ => None,
        }
    }

    /// The enum, if this export is an enum type
    #[must_use]
    pub fn as_enum(&self) -> Option<&Enum> {
        match self {
            Entity::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// Evaluated schema module: export name -> entity, in export order
///
/// Export names are unique; inserting an existing name replaces the entity in
/// place and keeps its original position.
///
/// # Examples
///
/// ```
/// use drizzle_dbml_types::schema::{Column, Schema, Table};
///
/// let schema = Schema::new()
///     .table("users", Table::new("users").column("id", Column::new("id", "serial").primary_key()))
///     .relations("usersRelations", "users");
///
/// assert_eq!(schema.tables().count(), 1);
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    entries: Vec<(String, Entity)>,
}

impl Schema {
    /// Create an empty schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an export, keeping the position of an existing name
    pub fn insert(&mut self, name: impl Into<String>, entity: Entity) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = entity,
            None => self.entries.push((name, entity)),
        }
    }

    /// Add a table export
    #[must_use]
    pub fn table(mut self, name: impl Into<String>, table: Table) -> Self {
        self.insert(name, Entity::Table(table));
        self
    }

    /// Add a relations export for the table exported as `table`
    #[must_use]
    pub fn relations(mut self, name: impl Into<String>, table: impl Into<String>) -> Self {
        self.insert(
            name,
            Entity::Relations(RelationsRef {
                table: table.into(),
            }),
        );
        self
    }

    /// Add an enum export
    #[must_use]
    pub fn enum_type(mut self, name: impl Into<String>, e: Enum) -> Self {
        self.insert(name, Entity::Enum(e));
        self
    }

    /// Number of exports
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is exported
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all exports in order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate table exports in order, with their export names
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.entries()
            .filter_map(|(k, v)| v.as_table().map(|table| (k, table)))
    }

    /// Iterate enum exports in order
    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.entries.iter().filter_map(|(_, v)| v.as_enum())
    }

    /// Look up a table by export name
    #[must_use]
    pub fn table_by_export(&self, name: &str) -> Option<&Table> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_table())
    }
}

impl<K: Into<String>> FromIterator<(K, Entity)> for Schema {
    fn from_iter<T: IntoIterator<Item = (K, Entity)>>(iter: T) -> Self {
        let mut schema = Schema::new();
        for (k, v) in iter {
            schema.insert(k, v);
        }
        schema
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Entity, Schema};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialized as a JSON object in export order
    impl Serialize for Schema {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            crate::serde_helpers::serialize_ordered_map(&self.entries, serializer)
        }
    }

    impl<'de> Deserialize<'de> for Schema {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let entries: Vec<(String, Entity)> = crate::serde_helpers::ordered_map(deserializer)?;
            Ok(entries.into_iter().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schema() {
        let schema = Schema::new();
        assert!(schema.is_empty());
        assert_eq!(schema.tables().count(), 0);
    }

    #[test]
    fn test_tables_skip_other_exports() {
        let schema = Schema::new()
            .enum_type("roleEnum", Enum::new("role", ["user", "admin"]))
            .table("users", Table::new("users"))
            .relations("usersRelations", "users")
            .table("posts", Table::new("posts"));

        let names: Vec<_> = schema.tables().map(|(k, t)| (k, t.name())).collect();
        assert_eq!(names, [("users", "users"), ("posts", "posts")]);
        assert_eq!(schema.enums().count(), 1);
        assert!(schema.table_by_export("usersRelations").is_none());
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let schema = Schema::new()
            .table("a", Table::new("a"))
            .table("b", Table::new("b"))
            .table("a", Table::new("a2"));
        let names: Vec<_> = schema.tables().map(|(_, t)| t.name()).collect();
        assert_eq!(names, ["a2", "b"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_schema_from_json() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "users": {
                    "kind": "table",
                    "name": "users",
                    "columns": {
                        "id": {"name": "id", "sqlType": "serial", "primaryKey": true, "notNull": true}
                    }
                },
                "usersRelations": {"kind": "relations", "table": "users"},
                "roleEnum": {"kind": "enum", "name": "role", "values": ["user", "admin"]}
            }"#,
        )
        .unwrap();

        let exports: Vec<_> = schema.entries().map(|(k, _)| k).collect();
        assert_eq!(exports, ["users", "usersRelations", "roleEnum"]);
        let users = schema.table_by_export("users").unwrap();
        assert!(users.column_by_key("id").unwrap().primary_key);
    }
}
