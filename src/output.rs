//! Rendered DBML document

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A top-level block (enum or table) and the name it was rendered for
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DbmlBlock {
    /// Database schema, `None` for the default one
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub schema: Option<String>,
    pub name: String,
    pub text: String,
}

impl DbmlBlock {
    /// `true` if this block was rendered for `schema`.`name`
    #[must_use]
    pub fn is(&self, schema: Option<&str>, name: &str) -> bool {
        self.schema.as_deref() == schema && self.name == name
    }

    /// `name`, or `schema.name` outside the default schema
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A `Ref:` statement and the table it starts from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DbmlRef {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub schema: Option<String>,
    pub table: String,
    pub text: String,
}

/// Result of a generation run
///
/// `Display` renders the whole document: enums, then tables, then refs,
/// with one blank line between top-level blocks and no trailing newline.
/// The parts stay available for multi-file output.
///
/// Tables are identified by database schema and SQL name together, so
/// `auth.users` and `users` are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dbml {
    pub enums: Vec<DbmlBlock>,
    pub tables: Vec<DbmlBlock>,
    pub refs: Vec<DbmlRef>,
}

impl Dbml {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.tables.is_empty() && self.refs.is_empty()
    }

    /// Rendered table block by database schema and SQL table name
    #[must_use]
    pub fn table(&self, schema: Option<&str>, name: &str) -> Option<&DbmlBlock> {
        self.tables.iter().find(|t| t.is(schema, name))
    }

    /// Refs that start from `schema`.`table`
    pub fn refs_from<'a>(
        &'a self,
        schema: Option<&'a str>,
        table: &'a str,
    ) -> impl Iterator<Item = &'a DbmlRef> + 'a {
        self.refs
            .iter()
            .filter(move |r| r.schema.as_deref() == schema && r.table == table)
    }

    /// Standalone document for one table: its block followed by its refs
    #[must_use]
    pub fn table_document(&self, schema: Option<&str>, name: &str) -> Option<String> {
        let table = self.table(schema, name)?;
        let refs: Vec<&str> = self
            .refs_from(schema, name)
            .map(|r| r.text.as_str())
            .collect();
        if refs.is_empty() {
            Some(table.text.clone())
        } else {
            Some(format!("{}\n\n{}", table.text, refs.join("\n")))
        }
    }

    /// Standalone document holding every enum block
    #[must_use]
    pub fn enums_document(&self) -> Option<String> {
        if self.enums.is_empty() {
            return None;
        }
        let blocks: Vec<&str> = self.enums.iter().map(|e| e.text.as_str()).collect();
        Some(blocks.join("\n\n"))
    }

    /// Add a ref unless the identical statement is already present
    pub(crate) fn push_ref(&mut self, schema: Option<&str>, table: &str, text: String) {
        if self.refs.iter().any(|r| r.text == text) {
            tracing::trace!(ref_ = %text, "skipping duplicate ref");
            return;
        }
        self.refs.push(DbmlRef {
            schema: schema.map(str::to_string),
            table: table.to_string(),
            text,
        });
    }
}

impl fmt::Display for Dbml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let refs = self
            .refs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut sections: Vec<&str> = self
            .enums
            .iter()
            .chain(&self.tables)
            .map(|block| block.text.as_str())
            .collect();
        if !refs.is_empty() {
            sections.push(&refs);
        }
        f.write_str(&sections.join("\n\n"))
    }
}
