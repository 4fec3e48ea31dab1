//! Generate command
//!
//! Renders DBML for a schema JSON export:
//! 1. Load the schema JSON (exported from the evaluated schema module)
//! 2. Extract comments and relations from the TypeScript source, if given
//! 3. Write the document to stdout, to `--out`, or one file per table with
//!    `--split`

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use drizzle_dbml::types::Dialect;
use drizzle_dbml::types::schema::Schema;
use drizzle_dbml::{Dbml, GenerateOptions, Generator};

use crate::config::DEFAULT_SPLIT_DIR;
use crate::error::CliError;
use crate::output;

/// Fully resolved generate options (config merged with flags)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    pub dialect: Dialect,
    pub schema: PathBuf,
    pub source: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub relational: bool,
    pub split: bool,
    pub force: bool,
}

pub fn run(args: &GenerateArgs) -> Result<(), CliError> {
    let schema = load_schema(&args.schema)?;
    tracing::debug!(
        path = %args.schema.display(),
        exports = schema.len(),
        dialect = %args.dialect,
        "loaded schema"
    );

    let mut options = GenerateOptions::new().relational(args.relational);
    if let Some(source) = &args.source {
        options = options.source(source);
    }
    let generator = Generator::for_dialect(args.dialect);

    if args.split {
        let dir = args
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SPLIT_DIR));
        let dbml = generator.generate(&schema, &options)?;
        return write_split(&dir, &dbml, args.force);
    }

    match &args.out {
        Some(out) => {
            if out.exists() && !args.force {
                return Err(CliError::OutputExists(out.clone()));
            }
            let dbml = generator.generate(&schema, &options.out(out))?;
            println!(
                "{} {} {}",
                output::success("Wrote"),
                out.display(),
                output::muted(&summary(&dbml))
            );
        }
        None => {
            let dbml = generator.generate(&schema, &options)?;
            if dbml.is_empty() {
                eprintln!("{}", output::warn_line("schema has no tables"));
            }
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{dbml}").map_err(CliError::io("<stdout>"))?;
        }
    }

    Ok(())
}

/// Decode the schema JSON export at `path`
pub fn load_schema(path: &Path) -> Result<Schema, CliError> {
    let content = fs::read_to_string(path).map_err(CliError::io(path))?;
    serde_json::from_str(&content).map_err(|source| CliError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

/// One file per table, plus `enums.dbml` when there are enum blocks.
/// Tables outside the default schema are written as `<schema>.<table>.dbml`.
///
/// Every target is checked before anything is written, so a refused
/// overwrite leaves the directory untouched.
fn write_split(dir: &Path, dbml: &Dbml, force: bool) -> Result<(), CliError> {
    let mut files: Vec<(PathBuf, String)> = Vec::new();
    if let Some(enums) = dbml.enums_document() {
        files.push((dir.join("enums.dbml"), enums));
    }
    for table in &dbml.tables {
        if let Some(document) = dbml.table_document(table.schema.as_deref(), &table.name) {
            files.push((dir.join(file_name(&table.qualified_name())), document));
        }
    }

    if !force {
        if let Some((path, _)) = files.iter().find(|(path, _)| path.exists()) {
            return Err(CliError::OutputExists(path.clone()));
        }
    }

    fs::create_dir_all(dir).map_err(CliError::io(dir))?;
    for (path, document) in &files {
        fs::write(path, format!("{document}\n")).map_err(CliError::io(path))?;
        tracing::debug!(path = %path.display(), "wrote dbml");
    }

    println!(
        "{} {} files to {} {}",
        output::success("Wrote"),
        files.len(),
        dir.display(),
        output::muted(&summary(dbml))
    );
    Ok(())
}

/// `<table>.dbml`, with path separators replaced
fn file_name(table: &str) -> String {
    let stem: String = table
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{stem}.dbml")
}

fn summary(dbml: &Dbml) -> String {
    format!(
        "({} tables, {} enums, {} refs)",
        dbml.tables.len(),
        dbml.enums.len(),
        dbml.refs.len()
    )
}
