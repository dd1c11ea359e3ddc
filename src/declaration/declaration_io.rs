//! Loading declaration trees from `templates.toml`.

use crate::constants::DECLARATION_FILE_NAME;
use crate::core::ConfigError;
use crate::declaration::TemplatesDeclaration;
use std::path::Path;
use tracing::debug;

impl TemplatesDeclaration {
    /// Load and validate the declaration file of a configuration root.
    ///
    /// Reads `<root>/templates.toml`, deserializes it and runs the structural
    /// checks of [`TemplatesDeclaration::validate`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ConfigurationNotFound`] if the file does not exist
    /// - [`ConfigError::FileSystemError`] if it cannot be read
    /// - [`ConfigError::MalformedConfiguration`] for TOML or structural errors
    /// - [`ConfigError::DuplicateTemplateScanName`] for reused scan names
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(DECLARATION_FILE_NAME);
        if !path.is_file() {
            return Err(ConfigError::ConfigurationNotFound {
                path,
            });
        }

        debug!("Loading template declarations from {}", path.display());

        let content = std::fs::read_to_string(&path).map_err(|source| {
            ConfigError::FileSystemError {
                path: path.clone(),
                source,
            }
        })?;

        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse and validate a declaration tree from TOML text.
    ///
    /// `file` only labels error messages.
    pub fn from_toml_str(content: &str, file: &str) -> Result<Self, ConfigError> {
        let declarations: Self =
            toml::from_str(content).map_err(|e| ConfigError::malformed(file, e.to_string().trim_end()))?;

        declarations.validate(file)?;

        debug!(
            "Parsed {} template(s), {} scan(s), {} extension(s), {} increment(s) from {}",
            declarations.templates.len(),
            declarations.template_scans.len(),
            declarations.template_extensions.len(),
            declarations.increments.len(),
            file
        );

        Ok(declarations)
    }
}
