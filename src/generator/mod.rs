//! Dialect-agnostic DBML generation engine

mod refs;
mod table;

use std::fs;
use std::path::{Path, PathBuf};

use drizzle_dbml_parser::{SchemaComments, SchemaRelations, SourceSet};
use drizzle_dbml_types::Dialect;
use drizzle_dbml_types::schema::{Enum, Schema};

use crate::builder::DbmlBuilder;
use crate::dialect::{DialectHooks, mysql, postgres, sqlite};
use crate::error::{Error, Result};
use crate::output::{Dbml, DbmlBlock};

// =============================================================================
// Options
// =============================================================================

/// Options for a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Schema source file or directory; enables comment and relation extraction
    pub source: Option<PathBuf>,
    /// Derive refs from `relations()` declarations instead of foreign keys
    pub relational: bool,
    /// Write the rendered document here as well as returning it
    pub out: Option<PathBuf>,
}

impl GenerateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    #[must_use]
    pub fn relational(mut self, relational: bool) -> Self {
        self.relational = relational;
        self
    }

    #[must_use]
    pub fn out(mut self, path: impl Into<PathBuf>) -> Self {
        self.out = Some(path.into());
        self
    }
}

/// Where `Ref:` statements come from
#[derive(Debug, Clone, Copy, Default)]
pub enum RefSource<'a> {
    /// Column and table foreign keys of the schema model
    #[default]
    ForeignKeys,
    /// `one` relations extracted from source
    Relations(&'a SchemaRelations),
    /// No refs
    None,
}

// =============================================================================
// Generator
// =============================================================================

/// DBML generator for one dialect
///
/// ```
/// use drizzle_dbml::Generator;
/// use drizzle_dbml::types::schema::{Column, Schema, Table};
///
/// let schema = Schema::new().table(
///     "users",
///     Table::new("users").column("id", Column::new("id", "serial").primary_key()),
/// );
/// let dbml = Generator::postgres().render(&schema, None, Default::default());
/// assert_eq!(
///     dbml.to_string(),
///     "Table \"users\" {\n  \"id\" serial [primary key, not null, increment]\n}"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    hooks: DialectHooks,
}

impl Generator {
    #[must_use]
    pub const fn new(hooks: DialectHooks) -> Self {
        Self { hooks }
    }

    #[must_use]
    pub const fn postgres() -> Self {
        Self::new(postgres::HOOKS)
    }

    #[must_use]
    pub const fn mysql() -> Self {
        Self::new(mysql::HOOKS)
    }

    #[must_use]
    pub const fn sqlite() -> Self {
        Self::new(sqlite::HOOKS)
    }

    #[must_use]
    pub const fn for_dialect(dialect: Dialect) -> Self {
        Self::new(DialectHooks::for_dialect(dialect))
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.hooks.dialect
    }

    /// Run the full pipeline: extract from `options.source` when given,
    /// render, and write to `options.out` when given
    pub fn generate(&self, schema: &Schema, options: &GenerateOptions) -> Result<Dbml> {
        let sources = options.source.as_deref().map(SourceSet::load).transpose()?;
        let comments = sources.as_ref().map(SourceSet::comments);
        let relations = match (&sources, options.relational) {
            (Some(set), true) => Some(set.relations()),
            (None, true) => {
                tracing::warn!("relational refs requested without a source path, no refs will be generated");
                None
            }
            _ => None,
        };

        if let Some(comments) = &comments {
            tracing::debug!(tables = comments.len(), "extracted table comments");
        }
        if let Some(relations) = &relations {
            tracing::debug!(relations = relations.len(), "extracted relations");
        }

        let refs = match (&relations, options.relational) {
            (Some(relations), _) => RefSource::Relations(relations),
            (None, true) => RefSource::None,
            (None, false) => RefSource::ForeignKeys,
        };
        let dbml = self.render(schema, comments.as_ref(), refs);

        if let Some(out) = &options.out {
            write_output(out, &dbml)?;
        }
        Ok(dbml)
    }

    /// Render `schema` with already extracted comments and refs
    pub fn render(
        &self,
        schema: &Schema,
        comments: Option<&SchemaComments>,
        refs: RefSource<'_>,
    ) -> Dbml {
        let mut dbml = Dbml::default();

        if let Some(collect) = self.hooks.collect_enums {
            for e in collect(schema) {
                dbml.enums.push(DbmlBlock {
                    schema: None,
                    name: e.name.clone(),
                    text: self.enum_block(&e),
                });
            }
        }

        for (export, table) in schema.tables() {
            let table_schema = db_schema(table.schema.as_deref());
            if dbml.table(table_schema, &table.name).is_some() {
                tracing::debug!(table = %table.name, export, "skipping table rendered under another export");
                continue;
            }
            let table_comments = comments.and_then(|c| {
                c.table_by_export(export)
                    .or_else(|| c.table_in(table_schema, &table.name))
            });
            dbml.tables.push(DbmlBlock {
                schema: table_schema.map(str::to_string),
                name: table.name.clone(),
                text: self.table_block(table, table_comments),
            });
        }

        match refs {
            RefSource::ForeignKeys => self.foreign_key_refs(schema, &mut dbml),
            RefSource::Relations(relations) => self.relation_refs(schema, relations, &mut dbml),
            RefSource::None => {}
        }

        tracing::debug!(
            dialect = %self.hooks.dialect,
            enums = dbml.enums.len(),
            tables = dbml.tables.len(),
            refs = dbml.refs.len(),
            "rendered dbml"
        );
        dbml
    }

    fn escape(&self, name: &str) -> String {
        (self.hooks.escape_name)(name)
    }

    /// `"name"`, or `"schema"."name"` outside the default schema
    fn table_name(&self, schema: Option<&str>, name: &str) -> String {
        match db_schema(schema) {
            Some(schema) => format!("{}.{}", self.escape(schema), self.escape(name)),
            None => self.escape(name),
        }
    }

    fn enum_block(&self, e: &Enum) -> String {
        let mut builder = DbmlBuilder::new();
        builder.line(format!("enum {} {{", self.escape(&e.name)));
        builder.indent();
        for value in &e.values {
            builder.line(self.escape(value));
        }
        builder.dedent();
        builder.line("}");
        builder.build()
    }
}

/// Database schema a table lives in, `None` for the default `public` schema
pub(crate) fn db_schema(schema: Option<&str>) -> Option<&str> {
    schema.filter(|s| *s != "public")
}

fn write_output(path: &Path, dbml: &Dbml) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, format!("{dbml}\n")).map_err(write_error)?;
    tracing::debug!(path = %path.display(), "wrote dbml");
    Ok(())
}
