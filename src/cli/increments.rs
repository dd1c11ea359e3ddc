//! List increments with their member templates.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::cli::common::{OutputFormat, load_reader};
use crate::context::ResolutionContext;
use crate::models::Increment;

/// Arguments of `gencat increments`.
#[derive(Args, Debug)]
pub struct IncrementsCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl IncrementsCommand {
    pub fn execute(self, root: &Path, context: &ResolutionContext) -> Result<()> {
        let reader = load_reader(root)?;
        let templates = reader
            .load_templates(&context.trigger, &context.relocations)
            .context("Failed to resolve templates")?;
        let increments = reader
            .load_increments(&templates, &context.trigger)
            .context("Failed to resolve increments")?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&increments)?),
            OutputFormat::Text => print!("{}", render_text(&increments)),
        }
        Ok(())
    }
}

fn render_text(increments: &BTreeMap<String, Increment>) -> String {
    let mut out = String::new();
    for increment in increments.values() {
        if increment.description.is_empty() {
            out.push_str(&format!("{} ({})\n", increment.name.bold(), increment.len()));
        } else {
            out.push_str(&format!(
                "{} ({}) - {}\n",
                increment.name.bold(),
                increment.len(),
                increment.description
            ));
        }
        for id in increment.template_ids() {
            out.push_str(&format!("  - {id}\n"));
        }
    }
    out.push_str(&format!("{} increments\n", increments.len()));
    out
}
