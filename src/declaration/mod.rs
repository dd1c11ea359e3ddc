//! Typed declaration tree of a configuration root.
//!
//! This is the input contract of the resolution engine. A configuration root
//! holds a `templates.toml` file describing four kinds of declarations:
//!
//! - `[[template]]`: an explicit template with an author-given name
//! - `[[template-scan]]`: a directory whose files each become a template
//! - `[[template-extension]]`: attribute overrides for an existing template id
//! - `[[increment]]`: a named bundle referencing templates, scans and increments
//!
//! # Format
//!
//! ```toml
//! [settings]
//! template-extension = "ftl"
//!
//! [[template]]
//! name = "prefix_Foo2Class.java"
//! template-file = "foo/Foo2Class.java.ftl"
//! destination-path = "src/main/java/foo/Foo2Class${variable}.java"
//! merge-strategy = "javamerge"
//!
//! [[template-scan]]
//! name = "foo_scan"
//! template-path = "foo"
//! template-name-prefix = "prefix_"
//! destination-path = "src/main/java/foo"
//! exclude = ["**/*.bak"]
//!
//! [[template-extension]]
//! ref = "prefix_FooClass.java"
//! merge-strategy = "javamerge"
//!
//! [[increment]]
//! name = "all"
//! description = "Everything in foo"
//! template-scans = ["foo_scan"]
//! ```
//!
//! Hosts that parse another format can build a [`TemplatesDeclaration`] by
//! hand and pass it to
//! [`ConfigurationReader::from_declarations`](crate::reader::ConfigurationReader::from_declarations).

mod declaration_io;
mod declaration_validation;


use crate::constants::DEFAULT_TEMPLATE_EXTENSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete declaration tree of one configuration root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatesDeclaration {
    /// Root-wide settings.
    #[serde(default)]
    pub settings: Settings,

    /// Explicit template declarations.
    #[serde(default, rename = "template", skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateDeclaration>,

    /// Directory scans synthesizing template declarations.
    #[serde(default, rename = "template-scan", skip_serializing_if = "Vec::is_empty")]
    pub template_scans: Vec<TemplateScanDeclaration>,

    /// Attribute overrides for templates declared elsewhere.
    #[serde(default, rename = "template-extension", skip_serializing_if = "Vec::is_empty")]
    pub template_extensions: Vec<TemplateExtensionDeclaration>,

    /// Named template bundles.
    #[serde(default, rename = "increment", skip_serializing_if = "Vec::is_empty")]
    pub increments: Vec<IncrementDeclaration>,
}

/// Root-wide settings of a declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Template-engine suffix stripped from scanned file names (without the dot).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_extension: Option<String>,
}

impl Settings {
    /// The configured template extension, or [`DEFAULT_TEMPLATE_EXTENSION`].
    #[must_use]
    pub fn template_extension(&self) -> &str {
        self.template_extension.as_deref().unwrap_or(DEFAULT_TEMPLATE_EXTENSION)
    }
}

/// An explicit `[[template]]` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TemplateDeclaration {
    /// Template id, unique within the catalog.
    pub name: String,
    /// Template source, relative to the configuration root.
    pub template_file: String,
    /// Unresolved target path; may contain `${...}` placeholders.
    pub destination_path: String,
    /// Merge collaborator used when the target already exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<String>,
    /// Target charset, defaults to the trigger charset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_charset: Option<String>,
    /// Variables handed to the template engine.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

/// A `[[template-scan]]` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TemplateScanDeclaration {
    /// Scan name. Only named scans can be referenced from increments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base directory of the scan, relative to the configuration root.
    pub template_path: String,
    /// Prefix prepended to every discovered file name to form the template id.
    #[serde(default)]
    pub template_name_prefix: String,
    /// Destination root; the discovered sub-path is appended to it.
    #[serde(default)]
    pub destination_path: String,
    /// Merge strategy applied to every discovered template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<String>,
    /// Target charset applied to every discovered template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_charset: Option<String>,
    /// Glob patterns, relative to the scan base, of files to skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Name of the derived package variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_variable: Option<String>,
    /// Directory, relative to the scan base, the package variable is measured from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_root: Option<String>,
}

impl TemplateScanDeclaration {
    /// Identifier used in errors and logs: the name, or the template path of
    /// an unnamed scan.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.template_path)
    }
}

/// A `[[template-extension]]` declaration.
///
/// Every attribute is optional; only present attributes override the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TemplateExtensionDeclaration {
    /// Id of the extended template.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Replacement unresolved target path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    /// Replacement merge strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_strategy: Option<String>,
    /// Replacement target charset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_charset: Option<String>,
    /// Variables added to (or replacing entries of) the template's variables.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

/// An `[[increment]]` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IncrementDeclaration {
    /// Increment id.
    pub name: String,
    /// Human-readable description shown by front ends.
    #[serde(default)]
    pub description: String,
    /// Referenced template ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    /// Referenced scan names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_scans: Vec<String>,
    /// Referenced (nested) increment ids.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub increments: Vec<String>,
}

/// A single reference held by an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementReference<'a> {
    /// A template id.
    Template(&'a str),
    /// A scan name.
    Scan(&'a str),
    /// A nested increment id.
    Increment(&'a str),
}

impl IncrementDeclaration {
    /// All references in expansion order: templates, scans, then nested increments.
    pub fn references(&self) -> impl Iterator<Item = IncrementReference<'_>> {
        self.templates
            .iter()
            .map(|t| IncrementReference::Template(t))
            .chain(self.template_scans.iter().map(|s| IncrementReference::Scan(s)))
            .chain(self.increments.iter().map(|i| IncrementReference::Increment(i)))
    }
}
