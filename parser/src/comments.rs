//! Doc comment extraction for tables and columns

use crate::ast::{Expr, Module, Property};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Doc comment of one column
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ColumnComment {
    /// SQL column name
    pub name: String,
    /// Property key in the columns object
    pub property: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub note: Option<String>,
}

/// Doc comments of one table declaration and its columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TableComments {
    /// SQL table name
    pub name: String,
    /// Database schema from `pgSchema('x').table(..)`, `None` for the default one
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub schema: Option<String>,
    /// Variable the table is bound to
    pub export: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub note: Option<String>,
    pub columns: Vec<ColumnComment>,
}

impl TableComments {
    /// Column by SQL name
    pub fn column(&self, name: &str) -> Option<&ColumnComment> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column by property key
    pub fn column_by_property(&self, property: &str) -> Option<&ColumnComment> {
        self.columns.iter().find(|c| c.property == property)
    }

    /// Note for a column, looked up by SQL name first and property key second
    pub fn column_note(&self, name: &str) -> Option<&str> {
        self.column(name)
            .or_else(|| self.column_by_property(name))
            .and_then(|c| c.note.as_deref())
    }
}

/// All table comments found in a set of sources, keyed by export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SchemaComments {
    tables: Vec<TableComments>,
}

impl SchemaComments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table; a later declaration bound to the same export
    /// replaces the earlier one in place
    pub fn insert(&mut self, table: TableComments) {
        match self.tables.iter_mut().find(|t| t.export == table.export) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn tables(&self) -> &[TableComments] {
        &self.tables
    }

    /// First table with SQL name `name`, in any schema
    pub fn table(&self, name: &str) -> Option<&TableComments> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table with SQL name `name` in database schema `schema`
    /// (`None` and `"public"` both mean the default schema)
    pub fn table_in(&self, schema: Option<&str>, name: &str) -> Option<&TableComments> {
        let schema = schema.filter(|s| *s != DEFAULT_SCHEMA);
        self.tables
            .iter()
            .find(|t| t.name == name && t.schema.as_deref() == schema)
    }

    pub fn table_by_export(&self, export: &str) -> Option<&TableComments> {
        self.tables.iter().find(|t| t.export == export)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Collect every table declaration of `module`
    pub(crate) fn collect(&mut self, module: &Module) {
        let schemas = schema_bindings(module);
        for decl in module.declarations() {
            for declarator in &decl.declarators {
                let Some(export) = declarator.name.as_deref() else {
                    continue;
                };
                let Some(init) = declarator.init.as_ref() else {
                    continue;
                };
                if let Some(mut table) = table_declaration(export, init, &schemas) {
                    table.note = declarator.doc.clone();
                    tracing::trace!(table = %table.name, export, "found table declaration");
                    self.insert(table);
                }
            }
        }
    }
}

/// Table builders are the functions whose name ends in `Table`
/// (`pgTable`, `mysqlTable`, `sqliteTable`, custom creators) or `table`
pub(crate) fn is_table_builder(name: &str) -> bool {
    name.ends_with("Table") || name == "table"
}

const DEFAULT_SCHEMA: &str = "public";

/// Variables bound to `pgSchema('name')` / `mysqlSchema('name')`
fn schema_bindings(module: &Module) -> Vec<(&str, &str)> {
    module
        .declarations()
        .into_iter()
        .flat_map(|decl| &decl.declarators)
        .filter_map(|d| Some((d.name.as_deref()?, schema_call(d.init.as_ref()?)?)))
        .collect()
}

/// Name passed to a `*Schema('name')` call
fn schema_call(expr: &Expr) -> Option<&str> {
    let (callee, args) = expr.as_call()?;
    if !callee.callee_name()?.ends_with("Schema") {
        return None;
    }
    args.first().and_then(Expr::as_str)
}

/// Schema a table builder callee belongs to: `auth.table` with `auth`
/// bound to a schema, or `pgSchema('auth').table` inline
fn callee_schema<'a>(callee: &'a Expr, schemas: &[(&str, &'a str)]) -> Option<&'a str> {
    let Expr::Member { object, .. } = callee else {
        return None;
    };
    let schema = match object.as_ref() {
        Expr::Ident(binding) => schemas
            .iter()
            .rev()
            .find(|(name, _)| *name == binding.as_str())
            .map(|(_, schema)| *schema),
        other => schema_call(other),
    }?;
    (schema != DEFAULT_SCHEMA).then_some(schema)
}

/// `<builder>('name', { ...columns })` bound to `export`
fn table_declaration(export: &str, init: &Expr, schemas: &[(&str, &str)]) -> Option<TableComments> {
    let (callee, args) = init.as_call()?;
    if !is_table_builder(callee.callee_name()?) {
        return None;
    }

    let sql_name = args.first().and_then(Expr::as_str);
    let columns_arg = if sql_name.is_some() {
        args.get(1)
    } else {
        args.first()
    };
    let name = sql_name.unwrap_or(export);
    let columns = columns_arg?.object_or_returned()?;

    Some(TableComments {
        name: name.to_string(),
        schema: callee_schema(callee, schemas).map(str::to_string),
        export: export.to_string(),
        note: None,
        columns: columns.iter().filter_map(column_comment).collect(),
    })
}

fn column_comment(prop: &Property) -> Option<ColumnComment> {
    let property = prop.key.as_deref()?;
    let name = column_name(&prop.value).unwrap_or(property);
    Some(ColumnComment {
        name: name.to_string(),
        property: property.to_string(),
        note: prop.doc.clone(),
    })
}

/// SQL name passed to the innermost builder call of a column chain:
/// `varchar('email', ..).notNull()` → `email`
pub(crate) fn column_name(expr: &Expr) -> Option<&str> {
    let mut current = expr;
    loop {
        match current {
            Expr::Call { callee, args } => match callee.as_ref() {
                Expr::Member { object, .. } if object.as_call().is_some() => current = object,
                _ => return args.first().and_then(Expr::as_str),
            },
            Expr::Member { object, .. } => current = object,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_module;

    fn comments(source: &str) -> SchemaComments {
        let mut out = SchemaComments::new();
        out.collect(&parse_module(source).unwrap());
        out
    }

    #[test]
    fn test_table_and_column_notes() {
        let out = comments(
            r#"
            /** Users table */
            export const users = pgTable('users', {
              /** Primary key */
              id: serial('id').primaryKey(),
              email: varchar('email', { length: 255 }).notNull(),
            });
            "#,
        );
        let users = out.table("users").unwrap();
        assert_eq!(users.note.as_deref(), Some("Users table"));
        assert_eq!(users.export, "users");
        assert_eq!(users.column_note("id"), Some("Primary key"));
        assert_eq!(users.column_note("email"), None);
        assert_eq!(users.columns.len(), 2);
    }

    #[test]
    fn test_sql_names_differ_from_keys() {
        let out = comments(
            r#"
            export const userAccounts = pgTable('user_accounts', {
              /** When created */
              createdAt: timestamp('created_at').defaultNow(),
            });
            "#,
        );
        let table = out.table("user_accounts").unwrap();
        assert_eq!(table.export, "userAccounts");
        let column = table.column("created_at").unwrap();
        assert_eq!(column.property, "createdAt");
        assert_eq!(table.column_note("createdAt"), Some("When created"));
    }

    #[test]
    fn test_name_falls_back_to_variable_and_key() {
        let out = comments("const items = sqliteTable({ /** n */ qty: integer() });");
        let table = out.table("items").unwrap();
        assert_eq!(table.column("qty").unwrap().note.as_deref(), Some("n"));
    }

    #[test]
    fn test_columns_from_callback() {
        let out = comments(
            r#"
            export const posts = sqliteTable('posts', (t) => ({
              /** Title */
              title: t.text('title').notNull(),
            }));
            "#,
        );
        assert_eq!(out.table("posts").unwrap().column_note("title"), Some("Title"));
    }

    #[test]
    fn test_non_table_declarations_ignored() {
        let out = comments(
            r#"
            export const roleEnum = pgEnum('role', ['a', 'b']);
            export const usersRelations = relations(users, ({ many }) => ({}));
            const x = pgTable;
            "#,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_table_without_comments_is_recorded() {
        let out = comments("export const t = mysqlTable('t', { id: int('id') });");
        let table = out.table("t").unwrap();
        assert_eq!(table.note, None);
        assert_eq!(table.column("id").unwrap().note, None);
    }

    #[test]
    fn test_column_name_innermost_call() {
        let module = parse_module("const a = t.varchar('mail').references(() => other.id);").unwrap();
        let init = module.declarations()[0].declarators[0].init.clone().unwrap();
        assert_eq!(column_name(&init), Some("mail"));
    }

    #[test]
    fn test_same_sql_name_in_two_schemas() {
        let out = comments(
            r#"
            export const auth = pgSchema('auth');

            /** Application users */
            export const users = pgTable('users', { id: serial('id') });

            /** Identity provider accounts */
            export const authUsers = auth.table('users', { id: uuid('id') });

            /** Billing accounts */
            export const billingUsers = pgSchema('billing').table('users', { id: uuid('id') });
            "#,
        );
        assert_eq!(out.len(), 3);

        let public = out.table_in(None, "users").unwrap();
        assert_eq!(public.note.as_deref(), Some("Application users"));
        assert_eq!(out.table_in(Some("public"), "users"), Some(public));

        let auth = out.table_in(Some("auth"), "users").unwrap();
        assert_eq!(auth.export, "authUsers");
        assert_eq!(auth.note.as_deref(), Some("Identity provider accounts"));
        assert_eq!(
            out.table_by_export("billingUsers").unwrap().schema.as_deref(),
            Some("billing")
        );
    }

    #[test]
    fn test_redeclared_export_replaces_earlier() {
        let out = comments(
            r#"
            /** First */
            const users = pgTable('users', { id: serial('id') });
            {
              /** Second */
              const users = pgTable('users', { id: serial('id') });
            }
            /** Renamed */
            const accounts = pgTable('users', { id: serial('id') });
            "#,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out.table_by_export("users").unwrap().note.as_deref(), Some("Second"));
        assert_eq!(out.table_by_export("accounts").unwrap().note.as_deref(), Some("Renamed"));
    }

    #[test]
    fn test_typed_json_columns() {
        let out = comments(
            r#"
            export const documents = pgTable('documents', {
              /** Meta blob */
              meta: jsonb('meta_data').$type<Meta>().notNull(),
              /** Tags */
              tags: jsonb('tag_list').$type<Array<string>>(),
              counts: jsonb('counts').$type<Record<string, Array<number>>>().default({}),
            });
            "#,
        );
        let table = out.table("documents").unwrap();
        assert_eq!(table.column_note("meta_data"), Some("Meta blob"));
        assert_eq!(table.column("meta_data").unwrap().property, "meta");
        assert_eq!(table.column("tag_list").unwrap().note.as_deref(), Some("Tags"));
        assert_eq!(table.column("counts").unwrap().property, "counts");
        assert_eq!(table.columns.len(), 3);
    }
}
