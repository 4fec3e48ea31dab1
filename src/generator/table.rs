//! Table block rendering

use drizzle_dbml_parser::TableComments;
use drizzle_dbml_types::map_type;
use drizzle_dbml_types::schema::{Column, Table};

use super::Generator;
use crate::builder::DbmlBuilder;
use crate::format::{default_literal, string_literal, type_token};

impl Generator {
    pub(super) fn table_block(&self, table: &Table, comments: Option<&TableComments>) -> String {
        let mut builder = DbmlBuilder::new();
        builder.line(format!(
            "Table {} {{",
            self.table_name(table.schema.as_deref(), &table.name)
        ));
        builder.indent();

        for (key, column) in &table.columns {
            let note = comments.and_then(|c| {
                c.column(&column.name)
                    .or_else(|| c.column_by_property(key))
                    .and_then(|c| c.note.as_deref())
            });
            builder.line(self.column_line(table, column, note));
        }

        let indexes = self.index_lines(table);
        if !indexes.is_empty() {
            builder.line("indexes {");
            builder.indent();
            for line in &indexes {
                builder.line(line);
            }
            builder.dedent();
            builder.line("}");
        }

        if let Some(note) = comments.and_then(|c| c.note.as_deref()) {
            builder.line(format!("Note: {}", string_literal(note)));
        }

        builder.dedent();
        builder.line("}");
        builder.build()
    }

    /// `"name" type [attributes]`
    fn column_line(&self, table: &Table, column: &Column, note: Option<&str>) -> String {
        let primary = renders_primary_key(table, column);

        let mut attrs: Vec<String> = Vec::new();
        if primary {
            attrs.push("primary key".into());
        }
        if column.not_null {
            attrs.push("not null".into());
        }
        if column.unique {
            attrs.push("unique".into());
        }
        if (self.hooks.is_increment)(column, primary) {
            attrs.push("increment".into());
        }
        if let Some(default) = &column.default {
            attrs.push(format!("default: {}", default_literal(default)));
        }
        if let Some(note) = note {
            attrs.push(format!("note: {}", string_literal(note)));
        }

        let mut line = format!("{} {}", self.escape(&column.name), self.column_type(column));
        if !attrs.is_empty() {
            line.push_str(&format!(" [{}]", attrs.join(", ")));
        }
        line
    }

    fn column_type(&self, column: &Column) -> String {
        match &column.enum_type {
            Some(e) if self.hooks.has_enum_blocks() => self.escape(&e.name),
            _ => type_token(map_type(&column.sql_type, self.hooks.dialect)),
        }
    }

    fn index_lines(&self, table: &Table) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(pk) = table.primary_key.as_ref().filter(|pk| pk.is_composite()) {
            lines.push(format!("{} [pk]", self.column_list(&pk.columns)));
        }

        for index in &table.indexes {
            if index.columns.is_empty() {
                continue;
            }
            let mut settings = Vec::new();
            if let Some(name) = &index.name {
                settings.push(format!("name: {}", string_literal(name)));
            }
            if index.unique {
                settings.push("unique".to_string());
            }

            let mut line = self.column_list(&index.columns);
            if !settings.is_empty() {
                line.push_str(&format!(" [{}]", settings.join(", ")));
            }
            lines.push(line);
        }

        lines
    }

    /// `"a"` for one column, `("a", "b")` for several
    pub(super) fn column_list<S: AsRef<str>>(&self, columns: &[S]) -> String {
        match columns {
            [single] => self.escape(single.as_ref()),
            _ => {
                let escaped: Vec<String> = columns.iter().map(|c| self.escape(c.as_ref())).collect();
                format!("({})", escaped.join(", "))
            }
        }
    }
}

/// Inline `primary key` applies to a column flagged as such, or named by a
/// single-column table primary key. A composite key suppresses it entirely.
fn renders_primary_key(table: &Table, column: &Column) -> bool {
    match &table.primary_key {
        Some(pk) if pk.is_composite() => false,
        Some(pk) => column.primary_key || pk.contains(&column.name),
        None => column.primary_key,
    }
}
