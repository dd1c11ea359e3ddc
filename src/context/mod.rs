//! Resolution context supplied by the caller.
//!
//! The engine resolves a configuration root *under* a [`Trigger`]: the
//! generation context that decided this configuration applies (its type,
//! matchers and default charset). Together with a [`RelocationRules`] table
//! it forms the [`ResolutionContext`]. Both are read-only inputs; the engine
//! never stores or mutates them.
//!
//! A context can be written by hand or loaded from a TOML file:
//!
//! ```toml
//! [trigger]
//! id = "java_entities"
//! type = "java"
//! template-folder = "crud_java"
//! input-charset = "UTF-8"
//!
//! [[trigger.matcher]]
//! type = "fqn"
//! value = "(.+)\\.dataaccess\\.api\\.(.+)Entity"
//!
//! [relocate]
//! api_scan = "../api/"
//! fqn = ""
//! ```

use crate::constants::DEFAULT_CHARSET;
use crate::core::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// Input matcher of a trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Matcher {
    /// Matcher type, e.g. `fqn` or `package`.
    #[serde(rename = "type")]
    pub matcher_type: String,
    /// Matcher value, usually a regular expression interpreted by the host.
    #[serde(default)]
    pub value: String,
}

/// Container matcher of a trigger (matches inputs that contain other inputs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ContainerMatcher {
    /// Matcher type.
    #[serde(rename = "type")]
    pub matcher_type: String,
    /// Matcher value.
    #[serde(default)]
    pub value: String,
    /// Whether contained inputs are retrieved recursively.
    #[serde(default)]
    pub retrieve_objects_recursively: bool,
}

/// The generation context a configuration is resolved under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Trigger {
    /// Trigger id.
    #[serde(default)]
    pub id: String,
    /// Trigger type; also a relocation rule key.
    #[serde(rename = "type", default)]
    pub trigger_type: String,
    /// Name of the template folder the configuration root belongs to.
    #[serde(default)]
    pub template_folder: String,
    /// Default charset of generated files.
    #[serde(default = "default_charset")]
    pub input_charset: String,
    /// Input matchers.
    #[serde(default, rename = "matcher", skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<Matcher>,
    /// Container matchers.
    #[serde(default, rename = "container-matcher", skip_serializing_if = "Vec::is_empty")]
    pub container_matchers: Vec<ContainerMatcher>,
}

fn default_charset() -> String {
    DEFAULT_CHARSET.to_string()
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            id: String::new(),
            trigger_type: String::new(),
            template_folder: String::new(),
            input_charset: default_charset(),
            matchers: Vec::new(),
            container_matchers: Vec::new(),
        }
    }
}

impl Trigger {
    /// Create a trigger without matchers.
    pub fn new(
        id: impl Into<String>,
        trigger_type: impl Into<String>,
        template_folder: impl Into<String>,
        input_charset: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            trigger_type: trigger_type.into(),
            template_folder: template_folder.into(),
            input_charset: input_charset.into(),
            matchers: Vec::new(),
            container_matchers: Vec::new(),
        }
    }

    /// Add an input matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.matchers.push(Matcher {
            matcher_type: matcher_type.into(),
            value: value.into(),
        });
        self
    }
}

/// Relocation expressions keyed by scan name, matcher type or trigger type.
///
/// An empty expression is an intentional "do not relocate" and stops the
/// lookup, unlike a missing key which lets lookup continue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelocationRules(BTreeMap<String, String>);

impl RelocationRules {
    /// Create an empty rule table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace a rule.
    #[must_use]
    pub fn with_rule(mut self, key: impl Into<String>, expression: impl Into<String>) -> Self {
        self.insert(key, expression);
        self
    }

    /// Add or replace a rule in place.
    pub fn insert(&mut self, key: impl Into<String>, expression: impl Into<String>) {
        self.0.insert(key.into(), expression.into());
    }

    /// Whether no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, expression)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Find the rule for a template.
    ///
    /// Keys are tried in order: the scan label (for scanned templates), each
    /// matcher type of the trigger, then the trigger type. The first key
    /// present wins, even if its expression is empty.
    pub fn lookup(&self, scan: Option<&str>, trigger: &Trigger) -> Option<&str> {
        let candidates = scan
            .into_iter()
            .chain(trigger.matchers.iter().map(|m| m.matcher_type.as_str()))
            .chain(std::iter::once(trigger.trigger_type.as_str()))
            .filter(|key| !key.is_empty());

        for key in candidates {
            if let Some(expression) = self.0.get(key) {
                trace!("Relocation rule '{}' matched: '{}'", key, expression);
                return Some(expression.as_str());
            }
        }
        None
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RelocationRules {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Trigger plus relocation rules, as loaded from a context file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolutionContext {
    /// The trigger.
    #[serde(default)]
    pub trigger: Trigger,
    /// Relocation rules.
    #[serde(default, rename = "relocate")]
    pub relocations: RelocationRules,
}

impl ResolutionContext {
    /// Load a context file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileSystemError`] if the file cannot be read,
    /// [`ConfigError::MalformedConfiguration`] if it is not a valid context.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::FileSystemError {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::malformed(path.display().to_string(), e.to_string().trim_end()))
    }
}
