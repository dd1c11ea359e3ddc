//! First phase: merge explicit declarations and scan drafts.

use crate::catalog::DraftCatalog;
use crate::context::Trigger;
use crate::core::ConfigError;
use crate::declaration::TemplateDeclaration;
use crate::models::{Template, TemplateOrigin};
use crate::scan::TemplateDraft;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, trace};

/// Builds the initial catalog of one configuration root.
pub struct TemplateCatalogBuilder<'a> {
    root: &'a Path,
    trigger: &'a Trigger,
}

impl<'a> TemplateCatalogBuilder<'a> {
    /// Create a builder resolving template files against `root` and
    /// defaulting charsets to the trigger's.
    pub const fn new(root: &'a Path, trigger: &'a Trigger) -> Self {
        Self {
            root,
            trigger,
        }
    }

    /// Build the catalog.
    ///
    /// Scan drafts are checked for collisions among themselves before explicit
    /// declarations are applied, so two scans producing the same id fail even
    /// when an explicit declaration would shadow that id.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateTemplateId`] when two scan drafts or two
    /// explicit declarations share an id.
    pub fn build(
        &self,
        explicit: &[TemplateDeclaration],
        drafts: &[TemplateDraft],
    ) -> Result<DraftCatalog, ConfigError> {
        let mut scanned: HashMap<&str, &TemplateDraft> = HashMap::with_capacity(drafts.len());
        for draft in drafts {
            if let Some(first) = scanned.insert(&draft.id, draft) {
                return Err(ConfigError::DuplicateTemplateId {
                    id: draft.id.clone(),
                    file_name: draft.file_name.clone(),
                    first: scan_source(first),
                    second: scan_source(draft),
                });
            }
        }

        let mut catalog = DraftCatalog::new();
        for declaration in explicit {
            if let Some(first) = catalog.get(&declaration.name) {
                return Err(ConfigError::DuplicateTemplateId {
                    id: declaration.name.clone(),
                    file_name: declaration.template_file.clone(),
                    first: explicit_source(&first.relative_template_path),
                    second: explicit_source(&declaration.template_file),
                });
            }
            catalog.insert(declaration.name.clone(), self.explicit_template(declaration));
        }

        for draft in drafts {
            if catalog.contains_key(&draft.id) {
                trace!("Scanned '{}' shadowed by explicit declaration", draft.id);
                continue;
            }
            catalog.insert(draft.id.clone(), self.scanned_template(draft));
        }

        debug!(
            "Built catalog with {} templates ({} explicit, {} scanned)",
            catalog.len(),
            explicit.len(),
            drafts.len()
        );
        Ok(catalog)
    }

    fn explicit_template(&self, declaration: &TemplateDeclaration) -> Template {
        Template {
            name: declaration.name.clone(),
            relative_template_path: declaration.template_file.clone(),
            absolute_template_path: self.root.join(&declaration.template_file),
            unresolved_template_path: declaration.destination_path.clone(),
            unresolved_target_path: declaration.destination_path.clone(),
            merge_strategy: declaration.merge_strategy.clone(),
            target_charset: self.charset(declaration.target_charset.as_deref()),
            variables: declaration.variables.clone(),
            origin: TemplateOrigin::Explicit,
        }
    }

    fn scanned_template(&self, draft: &TemplateDraft) -> Template {
        Template {
            name: draft.id.clone(),
            relative_template_path: draft.relative_template_path.clone(),
            absolute_template_path: draft.absolute_template_path.clone(),
            unresolved_template_path: draft.unresolved_target_path.clone(),
            unresolved_target_path: draft.unresolved_target_path.clone(),
            merge_strategy: draft.merge_strategy.clone(),
            target_charset: self.charset(draft.target_charset.as_deref()),
            variables: Default::default(),
            origin: draft.origin.clone(),
        }
    }

    fn charset(&self, declared: Option<&str>) -> String {
        declared.unwrap_or(&self.trigger.input_charset).to_string()
    }
}

fn scan_source(draft: &TemplateDraft) -> String {
    match &draft.origin {
        TemplateOrigin::Scan {
            scan,
            index,
            ..
        } => format!("template scan #{} '{scan}'", index + 1),
        TemplateOrigin::Explicit => explicit_source(&draft.relative_template_path),
    }
}

fn explicit_source(template_file: &str) -> String {
    format!("explicit template declaration of '{template_file}'")
}
