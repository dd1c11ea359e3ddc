//! Entry point of the resolution engine.
//!
//! A [`ConfigurationReader`] owns the validated declarations of one
//! configuration root together with the result of walking its scans. It is
//! immutable after construction, so resolving the same trigger twice yields
//! equal catalogs.
//!
//! # Example
//!
//! ```rust,no_run
//! use gencat::context::{RelocationRules, Trigger};
//! use gencat::reader::ConfigurationReader;
//!
//! # fn main() -> Result<(), gencat::core::ConfigError> {
//! let reader = ConfigurationReader::new("templates/crud_java")?;
//! let trigger = Trigger::new("crud_java", "java", "crud_java", "UTF-8");
//! let relocations = RelocationRules::new().with_rule("api_scan", "../api/");
//!
//! let templates = reader.load_templates(&trigger, &relocations)?;
//! let increments = reader.load_increments(&templates, &trigger)?;
//! for (name, increment) in &increments {
//!     println!("{name}: {} templates", increment.len());
//! }
//! # Ok(())
//! # }
//! ```

use crate::catalog::{self, ExtensionApplier, PathVariableDeriver, TemplateCatalogBuilder};
use crate::context::{RelocationRules, Trigger};
use crate::core::ConfigError;
use crate::declaration::TemplatesDeclaration;
use crate::models::{Increment, TemplateCatalog};
use crate::resolver::{IncrementGraph, IncrementResolver};
use crate::scan::{ScanEnumerator, TemplateDraft};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File label used for declaration trees that were not read from disk.
const IN_MEMORY: &str = "<in-memory>";

/// Resolves the templates and increments of one configuration root.
#[derive(Debug, Clone)]
pub struct ConfigurationReader {
    root: PathBuf,
    declarations: TemplatesDeclaration,
    drafts: Vec<TemplateDraft>,
    scan_members: BTreeMap<String, Vec<String>>,
}

impl ConfigurationReader {
    /// Load, validate and scan the configuration at `root`.
    ///
    /// # Errors
    ///
    /// Any loading error of [`TemplatesDeclaration::load`] and any scanning
    /// error of [`ScanEnumerator::enumerate`].
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let declarations = TemplatesDeclaration::load(root)?;
        Self::scan(root.to_path_buf(), declarations)
    }

    /// Create a reader for a declaration tree parsed by the caller.
    ///
    /// Template files and scan directories are still resolved against `root`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MalformedConfiguration`] and friends if the tree does not
    /// validate, or any scanning error.
    pub fn from_declarations(
        root: impl Into<PathBuf>,
        declarations: TemplatesDeclaration,
    ) -> Result<Self, ConfigError> {
        declarations.validate(IN_MEMORY)?;
        Self::scan(root.into(), declarations)
    }

    fn scan(root: PathBuf, declarations: TemplatesDeclaration) -> Result<Self, ConfigError> {
        let enumerator = ScanEnumerator::new(&root, declarations.settings.template_extension());

        let mut drafts = Vec::new();
        let mut scan_members = BTreeMap::new();
        for (index, scan) in declarations.template_scans.iter().enumerate() {
            let found = enumerator.enumerate(index, scan)?;
            if let Some(name) = &scan.name {
                scan_members.insert(name.clone(), found.iter().map(|draft| draft.id.clone()).collect());
            }
            drafts.extend(found);
        }

        debug!(
            "Configuration {} declares {} templates, {} scans ({} files), {} increments",
            root.display(),
            declarations.templates.len(),
            declarations.template_scans.len(),
            drafts.len(),
            declarations.increments.len()
        );

        Ok(Self {
            root,
            declarations,
            drafts,
            scan_members,
        })
    }

    /// The configuration root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The validated declaration tree.
    pub const fn declarations(&self) -> &TemplatesDeclaration {
        &self.declarations
    }

    /// Ids discovered by each named scan.
    pub const fn scan_members(&self) -> &BTreeMap<String, Vec<String>> {
        &self.scan_members
    }

    /// Resolve the template catalog under `trigger`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateTemplateId`],
    /// [`ConfigError::UnhookedTemplateExtension`] or
    /// [`ConfigError::DuplicateTemplateExtension`].
    pub fn load_templates(
        &self,
        trigger: &Trigger,
        relocations: &RelocationRules,
    ) -> Result<TemplateCatalog, ConfigError> {
        let catalog = TemplateCatalogBuilder::new(&self.root, trigger)
            .build(&self.declarations.templates, &self.drafts)?;
        let catalog = ExtensionApplier::new(&self.declarations.template_extensions).apply(catalog)?;
        let catalog =
            PathVariableDeriver::new(&self.declarations.template_scans, trigger, relocations).derive(catalog);

        info!("Resolved {} templates for trigger '{}'", catalog.len(), trigger.id);
        Ok(catalog::freeze(catalog))
    }

    /// Resolve all increments against a template catalog returned by
    /// [`load_templates`](Self::load_templates).
    ///
    /// # Errors
    ///
    /// See [`IncrementResolver::resolve`].
    pub fn load_increments(
        &self,
        templates: &TemplateCatalog,
        trigger: &Trigger,
    ) -> Result<BTreeMap<String, Increment>, ConfigError> {
        debug!("Resolving increments for trigger '{}'", trigger.id);
        IncrementResolver::new(&self.declarations.increments, templates, &self.scan_members).resolve()
    }

    /// Reference graph of the increment declarations.
    pub fn increment_graph(&self) -> IncrementGraph {
        IncrementGraph::from_declarations(&self.declarations.increments)
    }
}
