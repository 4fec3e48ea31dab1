//! Shared type definitions for drizzle-dbml
//!
//! This crate provides the pieces the generator and the CLI both need:
//!
//! - [`Dialect`] - Database dialect enum (SQLite, PostgreSQL, MySQL)
//! - [`schema`] - The live schema model the generator walks
//! - [`map_type`] - ORM type identifier -> DBML type token, per dialect
//!
//! # Features
//!
//! - `serde` - Enable serde serialization/deserialization of the schema model

mod dialect;
mod mapping;
pub mod mysql;
pub mod postgres;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde_helpers;
pub mod sqlite;

pub use dialect::{Dialect, DialectParseError};
pub use mapping::map_type;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::Dialect;
    pub use crate::map_type;
    pub use crate::schema::{
        Column, ColumnReference, DefaultValue, Entity, Enum, ForeignKey, Index, PrimaryKey,
        ReferentialAction, Schema, Table,
    };
}
