//! Resolve a configuration root and report whether it is usable.
//!
//! Validation runs the complete pipeline (declaration parsing, scans,
//! extensions, relocation and increment expansion) and fails with the first
//! configuration error. On success it prints what was resolved.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::Path;

use crate::cli::common::load_reader;
use crate::context::ResolutionContext;

/// Arguments of `gencat validate`.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Also list every template that still has unresolved placeholders
    #[arg(long)]
    placeholders: bool,
}

impl ValidateCommand {
    pub fn execute(self, root: &Path, context: &ResolutionContext) -> Result<()> {
        let reader = load_reader(root)?;
        let templates = reader
            .load_templates(&context.trigger, &context.relocations)
            .context("Failed to resolve templates")?;
        let increments = reader
            .load_increments(&templates, &context.trigger)
            .context("Failed to resolve increments")?;

        println!(
            "{} {} is valid: {} templates, {} increments",
            "✓".green(),
            root.display(),
            templates.len(),
            increments.len()
        );

        if self.placeholders {
            for template in templates.values() {
                let placeholders = template.placeholders();
                if !placeholders.is_empty() {
                    println!("  {}: {}", template.name, placeholders.join(", "));
                }
            }
        }
        Ok(())
    }
}
