//! Shared argument handling for CLI commands.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::context::ResolutionContext;
use crate::reader::ConfigurationReader;

/// Output format of listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Options that assemble the trigger and relocation rules.
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// TOML file with [trigger] and [relocate] tables
    #[arg(long = "context", global = true, value_name = "FILE")]
    pub context_file: Option<PathBuf>,

    /// Trigger id
    #[arg(long, global = true)]
    pub trigger_id: Option<String>,

    /// Trigger type, also used as a relocation key
    #[arg(long, global = true)]
    pub trigger_type: Option<String>,

    /// Default target charset
    #[arg(long, global = true)]
    pub charset: Option<String>,

    /// Relocation rule; an empty expression disables relocation for KEY
    #[arg(long, global = true, value_name = "KEY=EXPR", value_parser = parse_relocation)]
    pub relocate: Vec<(String, String)>,
}

impl ContextArgs {
    /// Build the resolution context: the context file first, then command-line
    /// overrides. The template folder defaults to the root's directory name.
    ///
    /// # Errors
    ///
    /// Fails if the context file cannot be loaded.
    pub fn build(&self, root: &Path) -> Result<ResolutionContext> {
        let mut context = match &self.context_file {
            Some(path) => ResolutionContext::load(path)
                .with_context(|| format!("Failed to load resolution context {}", path.display()))?,
            None => ResolutionContext::default(),
        };

        if let Some(id) = &self.trigger_id {
            context.trigger.id.clone_from(id);
        }
        if let Some(trigger_type) = &self.trigger_type {
            context.trigger.trigger_type.clone_from(trigger_type);
        }
        if let Some(charset) = &self.charset {
            context.trigger.input_charset.clone_from(charset);
        }
        for (key, expression) in &self.relocate {
            context.relocations.insert(key.as_str(), expression.as_str());
        }

        if context.trigger.template_folder.is_empty()
            && let Some(name) = root.canonicalize().ok().as_deref().and_then(Path::file_name)
        {
            context.trigger.template_folder = name.to_string_lossy().into_owned();
        }

        debug!(
            "Trigger '{}' (type '{}', charset {}), {} relocation rules",
            context.trigger.id,
            context.trigger.trigger_type,
            context.trigger.input_charset,
            context.relocations.iter().count()
        );
        Ok(context)
    }
}

/// Parse a `KEY=EXPR` relocation argument.
fn parse_relocation(value: &str) -> Result<(String, String), String> {
    let (key, expression) =
        value.split_once('=').ok_or_else(|| format!("expected KEY=EXPR, got '{value}'"))?;
    if key.is_empty() {
        return Err(format!("relocation key is empty in '{value}'"));
    }
    Ok((key.to_string(), expression.to_string()))
}

/// Load the configuration root, naming it in the error.
pub fn load_reader(root: &Path) -> Result<ConfigurationReader> {
    ConfigurationReader::new(root)
        .with_context(|| format!("Failed to load template configuration from {}", root.display()))
}
