//! Static extraction from drizzle TypeScript schema sources
//!
//! Schema files are never executed. They are tokenized and parsed into a
//! small syntax tree, from which two things are read:
//!
//! - doc comments (`/** ... */`) on table declarations and their column
//!   properties, see [`extract_comments`]
//! - `relations(...)` declarations, see [`extract_relations`]
//!
//! Use [`SourceSet`] directly to parse once and run both extractors.
//!
//! ```
//! use drizzle_dbml_parser::SourceSet;
//!
//! let set = SourceSet::from_source(
//!     "schema.ts",
//!     "/** Users table */\nexport const users = pgTable('users', { id: serial('id') });",
//! )
//! .unwrap();
//! let comments = set.comments();
//! assert_eq!(comments.table("users").unwrap().note.as_deref(), Some("Users table"));
//! ```

pub mod ast;
mod comments;
mod error;
pub mod lexer;
mod relations;
mod source;
pub mod syntax;

use std::path::Path;

pub use comments::{ColumnComment, SchemaComments, TableComments};
pub use error::{ExtractError, SyntaxError};
pub use relations::{Cardinality, ParsedRelation, SchemaRelations};
pub use source::{SourceFile, SourceSet, discover, is_schema_source};
pub use syntax::parse_module;

/// Doc comments of every table declared under `path` (a file or directory)
pub fn extract_comments(path: impl AsRef<Path>) -> Result<SchemaComments, ExtractError> {
    Ok(SourceSet::load(path)?.comments())
}

/// Relations declared under `path` (a file or directory)
pub fn extract_relations(path: impl AsRef<Path>) -> Result<SchemaRelations, ExtractError> {
    Ok(SourceSet::load(path)?.relations())
}
