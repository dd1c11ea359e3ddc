//! List the resolved template catalog.
//!
//! ```text
//! prefix_FooClass.java
//!   source:  foo/FooClass.java.ftl
//!   target:  ../api/src/main/java/foo/FooClass.java
//!   merge:   javamerge
//!   charset: UTF-8
//!   origin:  scan 'foo_scan'
//!   variables: relocate=../api/src/main/java/foo/${cwd}
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::cli::common::{OutputFormat, load_reader};
use crate::context::ResolutionContext;
use crate::models::{Template, TemplateCatalog, TemplateOrigin};

/// Arguments of `gencat templates`.
#[derive(Args, Debug)]
pub struct TemplatesCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl TemplatesCommand {
    pub fn execute(self, root: &Path, context: &ResolutionContext) -> Result<()> {
        let reader = load_reader(root)?;
        let templates = reader
            .load_templates(&context.trigger, &context.relocations)
            .context("Failed to resolve templates")?;

        match self.format {
            OutputFormat::Json => println!("{}", render_json(&templates)?),
            OutputFormat::Text => print!("{}", render_text(&templates)),
        }
        Ok(())
    }
}

fn render_json(templates: &TemplateCatalog) -> Result<String> {
    let plain: BTreeMap<&str, &Template> =
        templates.iter().map(|(id, template)| (id.as_str(), template.as_ref())).collect();
    Ok(serde_json::to_string_pretty(&plain)?)
}

fn render_text(templates: &TemplateCatalog) -> String {
    let mut out = String::new();
    for template in templates.values() {
        out.push_str(&format!("{}\n", template.name.bold()));
        out.push_str(&format!("  source:  {}\n", template.relative_template_path));
        out.push_str(&format!("  target:  {}\n", template.unresolved_target_path));
        out.push_str(&format!(
            "  merge:   {}\n",
            template.merge_strategy.as_deref().unwrap_or("overwrite")
        ));
        out.push_str(&format!("  charset: {}\n", template.target_charset));

        let origin = match &template.origin {
            TemplateOrigin::Explicit => "explicit".to_string(),
            TemplateOrigin::Scan {
                scan,
                ..
            } => format!("scan '{scan}'"),
        };
        out.push_str(&format!("  origin:  {origin}\n"));

        if !template.variables.is_empty() {
            let variables =
                template.variables.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(", ");
            out.push_str(&format!("  variables: {variables}\n"));
        }

        let placeholders = template.placeholders();
        if !placeholders.is_empty() {
            out.push_str(&format!("  placeholders: {}\n", placeholders.join(", ").dimmed()));
        }
    }
    out.push_str(&format!("{} templates\n", templates.len()));
    out
}
