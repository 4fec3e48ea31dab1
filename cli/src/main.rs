//! drizzle-dbml CLI - Main entry point

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, prelude::*};

use drizzle_dbml_cli::commands::{self, generate::GenerateArgs};
use drizzle_dbml_cli::config::Config;
use drizzle_dbml_cli::error::CliError;
use drizzle_dbml_cli::output;

/// drizzle-dbml - Generate DBML from drizzle ORM schemas
#[derive(Parser, Debug)]
#[command(name = "drizzle-dbml")]
#[command(author, version, about = "Generate DBML from drizzle ORM schemas", long_about = None)]
struct Cli {
    /// Path to config file (default: dbml.config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render DBML for a schema JSON export
    Generate {
        /// Database dialect (postgresql, mysql, sqlite)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Schema JSON export (default: schema.json)
        #[arg(short, long, value_name = "PATH")]
        schema: Option<PathBuf>,

        /// TypeScript schema file or directory for notes and relations
        #[arg(long, value_name = "PATH")]
        source: Option<PathBuf>,

        /// Output file, or output directory with --split
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Derive refs from relations() declarations instead of foreign keys
        #[arg(long)]
        relational: bool,

        /// Write one file per table
        #[arg(long)]
        split: bool,

        /// Overwrite existing output
        #[arg(short, long)]
        force: bool,
    },

    /// Print comments and relations extracted from TypeScript sources as JSON
    Inspect {
        /// TypeScript schema file or directory
        #[arg(long, value_name = "PATH")]
        source: Option<PathBuf>,
    },

    /// Initialize a new dbml.config.toml configuration file
    Init {
        /// Database dialect (postgresql, mysql, sqlite)
        #[arg(short, long, default_value = "sqlite")]
        dialect: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::err_line(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Init { dialect } => commands::init::run(&dialect),
        Command::Generate {
            dialect,
            schema,
            source,
            out,
            relational,
            split,
            force,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let dialect = match dialect {
                Some(name) => commands::parse_dialect(&name)?,
                None => config.dialect(),
            };
            let args = GenerateArgs {
                dialect,
                schema: schema.unwrap_or_else(|| config.schema_path()),
                source: source.or(config.source),
                out: out.or(config.out),
                relational: relational || config.relational,
                split: split || config.split,
                force: force || config.force,
            };
            commands::generate::run(&args)
        }
        Command::Inspect { source } => {
            let config = load_config(cli.config.as_deref())?;
            let source = source.or(config.source).ok_or(CliError::MissingSource)?;
            commands::inspect::run(&source)
        }
    }
}

/// Load configuration with fallback to the default path
fn load_config(custom_path: Option<&Path>) -> Result<Config, CliError> {
    match custom_path {
        Some(path) => Config::load_from(path).map_err(Into::into),
        None => Config::load().map_err(Into::into),
    }
}
