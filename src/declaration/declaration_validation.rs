//! Structural validation of declaration trees.
//!
//! These checks only look at the tree itself. Checks that need the resolved
//! catalog (duplicate ids, dangling references, cycles) run in the phase that
//! builds the catalog.

use crate::core::ConfigError;
use crate::declaration::TemplatesDeclaration;
use crate::pattern::{ExclusionSet, validate_path_safety};
use std::collections::HashSet;

impl TemplatesDeclaration {
    /// Validate the structure of the declaration tree.
    ///
    /// # Validation Rules
    ///
    /// - template names, template files and increment names are non-empty
    /// - template files, scan paths and package roots stay inside the root
    /// - extension references are non-empty
    /// - scan names are unique
    /// - exclusion patterns compile
    /// - the template extension setting has no leading dot and no separators
    ///
    /// `file` only labels error messages.
    pub fn validate(&self, file: &str) -> Result<(), ConfigError> {
        if let Some(extension) = &self.settings.template_extension
            && (extension.is_empty() || extension.starts_with('.') || extension.contains('/'))
        {
            return Err(ConfigError::malformed(
                file,
                format!("template-extension '{extension}' must be a bare suffix such as 'ftl'"),
            ));
        }

        for template in &self.templates {
            if template.name.trim().is_empty() {
                return Err(ConfigError::malformed(file, "[[template]] with an empty name"));
            }
            if template.template_file.trim().is_empty() {
                return Err(ConfigError::malformed(
                    file,
                    format!("template '{}' has an empty template-file", template.name),
                ));
            }
            validate_path_safety(&template.template_file).map_err(|reason| {
                ConfigError::malformed(file, format!("template '{}': {reason}", template.name))
            })?;
        }

        let mut scan_names = HashSet::new();
        for scan in &self.template_scans {
            if let Some(name) = &scan.name {
                if name.trim().is_empty() {
                    return Err(ConfigError::malformed(
                        file,
                        format!("template scan of '{}' has an empty name", scan.template_path),
                    ));
                }
                if !scan_names.insert(name.as_str()) {
                    return Err(ConfigError::DuplicateTemplateScanName {
                        name: name.clone(),
                    });
                }
            }

            validate_path_safety(&scan.template_path).map_err(|reason| {
                ConfigError::malformed(file, format!("template scan '{}': {reason}", scan.label()))
            })?;

            if let Some(root) = &scan.package_root {
                validate_path_safety(root).map_err(|reason| {
                    ConfigError::malformed(
                        file,
                        format!("package-root of template scan '{}': {reason}", scan.label()),
                    )
                })?;
            }

            ExclusionSet::new(&scan.exclude).map_err(|(pattern, reason)| {
                ConfigError::InvalidExclusionPattern {
                    scan: scan.label().to_string(),
                    pattern,
                    reason,
                }
            })?;
        }

        for extension in &self.template_extensions {
            if extension.reference.trim().is_empty() {
                return Err(ConfigError::malformed(file, "[[template-extension]] with an empty ref"));
            }
        }

        for increment in &self.increments {
            if increment.name.trim().is_empty() {
                return Err(ConfigError::malformed(file, "[[increment]] with an empty name"));
            }
        }

        Ok(())
    }
}
