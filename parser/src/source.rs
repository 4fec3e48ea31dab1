//! Schema source discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::Module;
use crate::comments::SchemaComments;
use crate::error::{ExtractError, SyntaxError};
use crate::relations::SchemaRelations;
use crate::syntax::parse_module;

/// File extensions treated as TypeScript sources
const EXTENSIONS: &[&str] = &["ts", "mts", "cts"];

/// Whether `path` looks like a schema source rather than a declaration
/// file, test, or vendored module
pub fn is_schema_source(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.contains(&e));
    let declaration = [".d.ts", ".d.mts", ".d.cts"]
        .iter()
        .any(|suffix| file_name.ends_with(suffix));
    let test_file = file_name.contains(".test.") || file_name.contains(".spec.");
    let excluded_dir = path.components().any(|c| {
        matches!(
            c.as_os_str().to_str(),
            Some("node_modules" | "__tests__")
        )
    });

    has_extension && !declaration && !test_file && !excluded_dir
}

/// Resolve a schema path into source files
///
/// A file path is used as-is. A directory is searched recursively for
/// TypeScript sources, returned in sorted order.
pub fn discover(path: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let metadata = fs::metadata(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = format!(
        "{}/**/*.*ts",
        glob::Pattern::escape(&path.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|e| ExtractError::Pattern(pattern.clone(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let file = entry.map_err(|e| ExtractError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if file.is_file() && is_schema_source(&file) {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// One parsed source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module: Module,
}

/// Parsed schema sources
///
/// Comment and relation extraction both run over the same parsed modules,
/// so a file is read and parsed once however many extractors use it.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: Vec<SourceFile>,
}

impl SourceSet {
    /// Discover, read and parse every source under `path`
    ///
    /// Read failures are errors. Files that fail to tokenize are skipped
    /// with a warning and contribute nothing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let mut set = Self::default();
        for file in discover(path.as_ref())? {
            let text = fs::read_to_string(&file).map_err(|source| ExtractError::Io {
                path: file.clone(),
                source,
            })?;
            match parse_module(&text) {
                Ok(module) => {
                    tracing::debug!(path = %file.display(), "parsed schema source");
                    set.files.push(SourceFile { path: file, module });
                }
                Err(err) => {
                    tracing::warn!(path = %file.display(), error = %err, "skipping unparseable schema source");
                }
            }
        }
        Ok(set)
    }

    /// Parse in-memory source text
    pub fn from_source(path: impl Into<PathBuf>, text: &str) -> Result<Self, SyntaxError> {
        let module = parse_module(text)?;
        Ok(Self {
            files: vec![SourceFile {
                path: path.into(),
                module,
            }],
        })
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Table and column doc comments across all files
    pub fn comments(&self) -> SchemaComments {
        let mut comments = SchemaComments::new();
        for file in &self.files {
            comments.collect(&file.module);
        }
        comments
    }

    /// Relation declarations across all files, in file order
    pub fn relations(&self) -> SchemaRelations {
        let mut relations = SchemaRelations::new();
        for file in &self.files {
            relations.collect(&file.module);
        }
        relations
    }
}
