//! `Ref:` statements from foreign keys or extracted relations

use drizzle_dbml_parser::{Cardinality, SchemaRelations};
use drizzle_dbml_types::schema::{ReferentialAction, Schema, Table};

use super::{Generator, db_schema};
use crate::output::Dbml;

impl Generator {
    /// One ref per column reference, then one per table-level foreign key,
    /// in table order
    pub(super) fn foreign_key_refs(&self, schema: &Schema, dbml: &mut Dbml) {
        for (_, table) in schema.tables() {
            let schema_name = table.schema.as_deref();

            for column in table.columns() {
                let Some(target) = &column.references else {
                    continue;
                };
                let text = self.ref_statement(
                    self.endpoint(schema_name, &table.name, &[column.name.as_str()]),
                    self.endpoint(target.schema.as_deref(), &target.table, &[target.column.as_str()]),
                    target.on_delete,
                    target.on_update,
                );
                dbml.push_ref(db_schema(schema_name), &table.name, text);
            }

            for fk in &table.foreign_keys {
                if fk.columns.is_empty() || fk.columns.len() != fk.foreign_columns.len() {
                    tracing::debug!(table = %table.name, "skipping foreign key with mismatched columns");
                    continue;
                }
                let text = self.ref_statement(
                    self.endpoint(schema_name, &table.name, &fk.columns),
                    self.endpoint(fk.foreign_schema.as_deref(), &fk.foreign_table, &fk.foreign_columns),
                    fk.on_delete,
                    fk.on_update,
                );
                dbml.push_ref(db_schema(schema_name), &table.name, text);
            }
        }
    }

    /// One ref per `one` relation that names its columns. Source identifiers
    /// resolve through the schema: table exports to SQL table names and
    /// property keys to SQL column names. Unresolved identifiers are used
    /// as written.
    pub(super) fn relation_refs(&self, schema: &Schema, relations: &SchemaRelations, dbml: &mut Dbml) {
        for relation in relations {
            if relation.cardinality != Cardinality::One {
                continue;
            }
            if !relation.has_columns() {
                tracing::trace!(relation = %relation.name, "skipping relation without field pairs");
                continue;
            }

            let source = schema.table_by_export(&relation.source_table);
            let target = schema.table_by_export(&relation.target_table);

            let (source_schema, source_name) = table_identity(source, &relation.source_table);
            let (target_schema, target_name) = table_identity(target, &relation.target_table);
            let fields = resolve_columns(source, &relation.fields);
            let references = resolve_columns(target, &relation.references);

            let text = self.ref_statement(
                self.endpoint(source_schema, source_name, &fields),
                self.endpoint(target_schema, target_name, &references),
                None,
                None,
            );
            dbml.push_ref(db_schema(source_schema), source_name, text);
        }
    }

    fn endpoint<S: AsRef<str>>(&self, schema: Option<&str>, table: &str, columns: &[S]) -> String {
        let table = self.table_name(schema, table);
        format!("{table}.{}", self.column_list(columns))
    }

    fn ref_statement(
        &self,
        from: String,
        to: String,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    ) -> String {
        let mut settings = Vec::new();
        if let Some(action) = on_delete {
            settings.push(format!("delete: {action}"));
        }
        if let Some(action) = on_update {
            settings.push(format!("update: {action}"));
        }

        let mut line = format!("Ref: {from} > {to}");
        if !settings.is_empty() {
            line.push_str(&format!(" [{}]", settings.join(", ")));
        }
        line
    }
}

fn table_identity<'a>(table: Option<&'a Table>, fallback: &'a str) -> (Option<&'a str>, &'a str) {
    match table {
        Some(table) => (table.schema.as_deref(), table.name.as_str()),
        None => (None, fallback),
    }
}

fn resolve_columns<'a>(table: Option<&'a Table>, keys: &'a [String]) -> Vec<&'a str> {
    keys.iter()
        .map(|key| {
            table
                .and_then(|t| t.column_by_key(key).or_else(|| t.column_by_name(key)))
                .map_or(key.as_str(), |c| c.name.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drizzle_dbml_types::schema::{Column, ColumnReference, ForeignKey};

    #[test]
    fn test_ref_statement_settings() {
        let g = Generator::postgres();
        assert_eq!(
            g.ref_statement("a".into(), "b".into(), None, None),
            "Ref: a > b"
        );
        assert_eq!(
            g.ref_statement(
                "a".into(),
                "b".into(),
                Some(ReferentialAction::Cascade),
                Some(ReferentialAction::SetNull)
            ),
            "Ref: a > b [delete: cascade, update: set null]"
        );
    }

    #[test]
    fn test_column_and_composite_foreign_keys() {
        let schema = Schema::new().table(
            "items",
            Table::new("items")
                .schema("shop")
                .column(
                    "ownerId",
                    Column::new("owner_id", "integer").references(ColumnReference::new("users", "id")),
                )
                .foreign_key(
                    ForeignKey::new(["order_id", "shop_id"], "orders", ["id", "shop_id"])
                        .on_delete(ReferentialAction::Cascade),
                ),
        );
        let mut dbml = Dbml::default();
        Generator::postgres().foreign_key_refs(&schema, &mut dbml);
        let refs: Vec<_> = dbml.refs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            refs,
            vec![
                "Ref: \"shop\".\"items\".\"owner_id\" > \"users\".\"id\"",
                "Ref: \"shop\".\"items\".(\"order_id\", \"shop_id\") > \"orders\".(\"id\", \"shop_id\") [delete: cascade]",
            ]
        );
    }

    #[test]
    fn test_resolve_columns_fallback() {
        let table = Table::new("posts").column("authorId", Column::new("author_id", "integer"));
        let keys = vec!["authorId".to_string(), "missing".to_string()];
        assert_eq!(resolve_columns(Some(&table), &keys), vec!["author_id", "missing"]);
        assert_eq!(resolve_columns(None, &keys), vec!["authorId", "missing"]);
    }
}
