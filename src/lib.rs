//! # drizzle-dbml
//!
//! Generate [DBML](https://dbml.dbdiagram.io/docs/) documents from drizzle ORM
//! schemas.
//!
//! The input is a live [`Schema`]: the exports of an evaluated schema module,
//! with tables, columns, constraints and enums. Two things DBML can carry are
//! not present on the live objects, so they are read statically from the
//! TypeScript source when a path is given:
//!
//! - `/** ... */` doc comments on tables and columns become `Note:` entries
//! - `relations(...)` declarations can replace foreign keys as the source of
//!   `Ref:` statements
//!
//! ## Example
//!
//! ```
//! use drizzle_dbml::GenerateOptions;
//! use drizzle_dbml::types::schema::{Column, ColumnReference, Schema, Table};
//!
//! let schema = Schema::new()
//!     .table("users", Table::new("users").column("id", Column::new("id", "integer").primary_key()))
//!     .table(
//!         "posts",
//!         Table::new("posts").column(
//!             "authorId",
//!             Column::new("author_id", "integer").references(ColumnReference::new("users", "id")),
//!         ),
//!     );
//!
//! let dbml = drizzle_dbml::sqlite_generate(&schema, &GenerateOptions::new()).unwrap();
//! assert!(dbml.contains("Ref: \"posts\".\"author_id\" > \"users\".\"id\""));
//! ```
//!
//! ## Features
//!
//! - `serde` - serialize [`Dbml`] and enable serde on the schema model

mod builder;
pub mod dialect;
mod error;
mod format;
mod generator;
mod output;

pub use builder::DbmlBuilder;
pub use dialect::DialectHooks;
pub use error::{Error, Result};
pub use generator::{GenerateOptions, Generator, RefSource};
pub use output::{Dbml, DbmlBlock, DbmlRef};

pub use drizzle_dbml_parser as parser;
pub use drizzle_dbml_parser::{extract_comments, extract_relations};
pub use drizzle_dbml_types as types;
pub use drizzle_dbml_types::Dialect;

use drizzle_dbml_types::schema::Schema;

/// Generate a DBML document for `schema` in the given dialect
///
/// Returns the full document text. When `options.out` is set the same text
/// is also written there, followed by a newline.
pub fn generate(dialect: Dialect, schema: &Schema, options: &GenerateOptions) -> Result<String> {
    Generator::for_dialect(dialect)
        .generate(schema, options)
        .map(|dbml| dbml.to_string())
}

/// [`generate`] for PostgreSQL schemas
pub fn pg_generate(schema: &Schema, options: &GenerateOptions) -> Result<String> {
    generate(Dialect::PostgreSQL, schema, options)
}

/// [`generate`] for MySQL schemas
pub fn mysql_generate(schema: &Schema, options: &GenerateOptions) -> Result<String> {
    generate(Dialect::MySQL, schema, options)
}

/// [`generate`] for SQLite schemas
pub fn sqlite_generate(schema: &Schema, options: &GenerateOptions) -> Result<String> {
    generate(Dialect::SQLite, schema, options)
}
