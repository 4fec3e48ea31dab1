//! Inspect command
//!
//! Prints what static extraction finds in the TypeScript source as JSON,
//! without needing a schema export.

use std::path::Path;

use drizzle_dbml_parser::{SchemaComments, SchemaRelations, SourceSet};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct Report<'a> {
    comments: &'a SchemaComments,
    relations: &'a SchemaRelations,
}

pub fn run(source: &Path) -> Result<(), CliError> {
    let json = render(source)?;
    println!("{json}");
    Ok(())
}

/// Pretty JSON report of comments and relations under `source`
pub fn render(source: &Path) -> Result<String, CliError> {
    let set = SourceSet::load(source).map_err(drizzle_dbml::Error::from)?;
    tracing::debug!(files = set.files().len(), "parsed sources");

    let comments = set.comments();
    let relations = set.relations();
    serde_json::to_string_pretty(&Report {
        comments: &comments,
        relations: &relations,
    })
    .map_err(CliError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_report() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("schema.ts"),
            "/** People */\nexport const users = sqliteTable('users', { id: integer('id') });",
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&render(dir.path()).unwrap()).unwrap();
        assert_eq!(json["comments"][0]["name"], "users");
        assert_eq!(json["comments"][0]["note"], "People");
        assert_eq!(json["relations"], serde_json::json!([]));
    }
}
