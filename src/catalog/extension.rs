//! Second phase: `[[template-extension]]` overrides.
//!
//! Extensions are the last declared override layer. They apply to explicit
//! and scanned templates alike, one attribute at a time: an attribute absent
//! from the extension leaves the template's value untouched. Variables are
//! merged key by key.

use crate::catalog::DraftCatalog;
use crate::core::{ConfigError, closest_match};
use crate::declaration::TemplateExtensionDeclaration;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Applies extension declarations to a catalog.
pub struct ExtensionApplier<'a> {
    extensions: &'a [TemplateExtensionDeclaration],
}

impl<'a> ExtensionApplier<'a> {
    /// Create an applier for `extensions`.
    pub const fn new(extensions: &'a [TemplateExtensionDeclaration]) -> Self {
        Self {
            extensions,
        }
    }

    /// Apply every extension to `catalog`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateTemplateExtension`] if two extensions target
    ///   the same id (checked before anything is applied)
    /// - [`ConfigError::UnhookedTemplateExtension`] if an extension targets an
    ///   id missing from the catalog
    pub fn apply(&self, mut catalog: DraftCatalog) -> Result<DraftCatalog, ConfigError> {
        let mut seen = HashSet::with_capacity(self.extensions.len());
        for extension in self.extensions {
            if !seen.insert(extension.reference.as_str()) {
                return Err(ConfigError::DuplicateTemplateExtension {
                    reference: extension.reference.clone(),
                });
            }
        }

        for extension in self.extensions {
            let Some(template) = catalog.get_mut(&extension.reference) else {
                return Err(ConfigError::UnhookedTemplateExtension {
                    reference: extension.reference.clone(),
                    suggestion: closest_match(&extension.reference, catalog.keys().map(String::as_str)),
                });
            };

            if let Some(path) = &extension.destination_path {
                trace!("Extension overrides target of '{}': {}", template.name, path);
                template.unresolved_target_path.clone_from(path);
                template.unresolved_template_path.clone_from(path);
            }
            if let Some(strategy) = &extension.merge_strategy {
                template.merge_strategy = Some(strategy.clone());
            }
            if let Some(charset) = &extension.target_charset {
                template.target_charset.clone_from(charset);
            }
            template.variables.extend(extension.variables.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if !self.extensions.is_empty() {
            debug!("Applied {} template extensions", self.extensions.len());
        }
        Ok(catalog)
    }
}
