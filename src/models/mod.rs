//! Resolved catalog entries: templates and increments.
//!
//! These are the outputs of resolution. Both are immutable once a catalog is
//! returned; templates are shared between the template catalog and every
//! increment that contains them through [`Arc`].

use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Resolved template catalog keyed by template id.
pub type TemplateCatalog = BTreeMap<String, Arc<Template>>;

/// Where a template declaration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TemplateOrigin {
    /// An explicit `[[template]]` declaration.
    Explicit,
    /// A file discovered by a `[[template-scan]]`.
    Scan {
        /// Label of the scan.
        scan: String,
        /// Position of the scan among the `[[template-scan]]` declarations.
        index: usize,
        /// Directory of the file relative to the scan base (`""` for the base).
        directory: String,
    },
}

impl TemplateOrigin {
    /// Label of the owning scan, if any.
    pub fn scan(&self) -> Option<&str> {
        match self {
            Self::Explicit => None,
            Self::Scan {
                scan,
                ..
            } => Some(scan),
        }
    }
}

/// One generation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Template {
    /// Template id, equal to its catalog key.
    pub name: String,
    /// Template source relative to the configuration root.
    pub relative_template_path: String,
    /// Template source on disk.
    pub absolute_template_path: PathBuf,
    /// Target path before relocation.
    pub unresolved_template_path: String,
    /// Final target path, still containing placeholders.
    pub unresolved_target_path: String,
    /// Merge collaborator id; `None` means overwrite.
    pub merge_strategy: Option<String>,
    /// Charset of the generated file.
    pub target_charset: String,
    /// Variables for the template engine.
    pub variables: BTreeMap<String, String>,
    /// Declaration that produced this template.
    pub origin: TemplateOrigin,
}

impl Template {
    /// Names of the `${...}` placeholders left in the target path, in order of
    /// first appearance.
    ///
    /// ```rust
    /// # use gencat::models::{Template, TemplateOrigin};
    /// # use std::collections::BTreeMap;
    /// let template = Template {
    ///     name: "Entity.java".into(),
    ///     relative_template_path: "Entity.java.ftl".into(),
    ///     absolute_template_path: "/t/Entity.java.ftl".into(),
    ///     unresolved_template_path: "${rootpackage}/${entity}Entity.java".into(),
    ///     unresolved_target_path: "../api/${rootpackage}/${entity}Entity.java".into(),
    ///     merge_strategy: None,
    ///     target_charset: "UTF-8".into(),
    ///     variables: BTreeMap::new(),
    ///     origin: TemplateOrigin::Explicit,
    /// };
    /// assert_eq!(template.placeholders(), vec!["rootpackage", "entity"]);
    /// ```
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for capture in PLACEHOLDER.captures_iter(&self.unresolved_target_path) {
            if let Some(name) = capture.get(1).map(|m| m.as_str())
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }
}

/// A named, user-selectable bundle of templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Increment {
    /// Increment id.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Members keyed by template id.
    #[serde(serialize_with = "serialize_member_ids")]
    pub templates: BTreeMap<String, Arc<Template>>,
}

fn serialize_member_ids<S: Serializer>(
    templates: &BTreeMap<String, Arc<Template>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(templates.keys())
}

impl Increment {
    /// Whether the increment contains the template with id `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Number of member templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the increment has no members.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Member template ids in sorted order.
    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}
