//! drizzle-dbml CLI - render DBML from drizzle schemas
//!
//! The CLI takes a JSON export of an evaluated drizzle schema module and,
//! optionally, the TypeScript sources it was declared in. Doc comments and
//! `relations()` declarations are read from the sources statically.
//!
//! # Configuration
//!
//! Settings can live in a `dbml.config.toml` next to your project (or run
//! `drizzle-dbml init`):
//!
//! ```toml
//! dialect = "postgresql"
//! schema = "schema.json"
//! source = "src/db/schema.ts"
//! out = "schema.dbml"
//! relational = true
//! ```
//!
//! Flags given on the command line override the file.
//!
//! # Commands
//!
//! - `drizzle-dbml init` - Create a starter `dbml.config.toml`
//! - `drizzle-dbml generate` - Render DBML to stdout, a file, or one file per table
//! - `drizzle-dbml inspect` - Print extracted comments and relations as JSON

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use config::{Config, Error as ConfigError};
pub use error::CliError;
