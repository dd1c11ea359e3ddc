//! Command-line interface for gencat.
//!
//! The binary is a thin front end over [`ConfigurationReader`](crate::reader::ConfigurationReader):
//! it loads one configuration root, resolves it under a trigger assembled from
//! the command line, and prints the result.
//!
//! # Commands
//!
//! - `templates` - list the resolved template catalog
//! - `increments` - list increments and their member templates
//! - `validate` - resolve everything and report counts
//! - `tree` - show the nested reference structure of one increment
//!
//! # Global Options
//!
//! - `--root <DIR>` - configuration root containing `templates.toml` (default `.`)
//! - `--context <FILE>` - TOML file with a `[trigger]` and `[relocate]` table
//! - `--trigger-id`, `--trigger-type`, `--charset` - override trigger fields
//! - `--relocate KEY=EXPR` - add a relocation rule (repeatable)
//! - `--verbose` / `--quiet` - log level `debug` / `error` (default `warn`)
//!
//! `RUST_LOG` takes precedence over `--verbose` and `--quiet`.
//!
//! # Example
//!
//! ```bash
//! gencat --root templates/crud_java --trigger-type java --relocate api_scan=../api/ templates
//! gencat --root templates/crud_java --context context.toml increments --format json
//! gencat tree all
//! ```

pub mod common;
mod increments;
mod templates;
mod tree;
mod validate;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use common::{ContextArgs, OutputFormat};

/// Main CLI structure for gencat.
#[derive(Parser, Debug)]
#[command(
    name = "gencat",
    about = "Resolve template configurations into template and increment catalogs",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Configuration root containing templates.toml
    #[arg(long, global = true, default_value = ".", env = "GENCAT_ROOT", value_name = "DIR")]
    root: PathBuf,

    /// Resolution context options
    #[command(flatten)]
    context: ContextArgs,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the resolved template catalog
    Templates(templates::TemplatesCommand),

    /// List increments with their member templates
    Increments(increments::IncrementsCommand),

    /// Resolve templates and increments and report problems
    Validate(validate::ValidateCommand),

    /// Show the nested references of an increment
    Tree(tree::TreeCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Any configuration error, wrapped with the step that failed.
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level());

        let context = self.context.build(&self.root)?;
        match self.command {
            Commands::Templates(cmd) => cmd.execute(&self.root, &context),
            Commands::Increments(cmd) => cmd.execute(&self.root, &context),
            Commands::Validate(cmd) => cmd.execute(&self.root, &context),
            Commands::Tree(cmd) => cmd.execute(&self.root),
        }
    }

    /// Log level selected by `--verbose` / `--quiet`.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level` when set. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_logging(level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
