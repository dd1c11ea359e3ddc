//! Increment resolution.
//!
//! Increments are flattened into plain template sets against a finished
//! template catalog. An increment may reference:
//!
//! - a template id, resolved against the catalog
//! - a named template scan, meaning every template the scan discovered
//! - another increment, meaning that increment's fully expanded set
//!
//! ```toml
//! [[increment]]
//! name = "dataaccess"
//! templates = ["EntityDao.java"]
//! template-scans = ["entity_scan"]
//!
//! [[increment]]
//! name = "all"
//! increments = ["dataaccess", "logic"]
//! ```
//!
//! Expansion is recursive with an explicit stack of increments being
//! expanded, so `a → b → a` fails with
//! [`ConfigError::IncrementReferenceCycle`] instead of recursing forever.
//! Expanded increments are memoized, so a diamond of references expands
//! every increment once. Member sets are keyed by template id, which makes
//! flattening a true set union.
//!
//! Resolution is all or nothing: the first dangling reference fails the whole
//! call and no partial map is returned.

pub mod reference_graph;

pub use reference_graph::{IncrementGraph, ReferenceNode};

use crate::core::{ConfigError, closest_match};
use crate::declaration::{IncrementDeclaration, IncrementReference};
use crate::models::{Increment, Template, TemplateCatalog};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, trace};

/// Members of an increment keyed by template id.
type MemberSet = BTreeMap<String, Arc<Template>>;

/// Flattens increment declarations against a template catalog.
pub struct IncrementResolver<'a> {
    declarations: &'a [IncrementDeclaration],
    templates: &'a TemplateCatalog,
    scan_members: &'a BTreeMap<String, Vec<String>>,
}

impl<'a> IncrementResolver<'a> {
    /// Create a resolver.
    ///
    /// `scan_members` maps each named scan to the ids it discovered.
    pub const fn new(
        declarations: &'a [IncrementDeclaration],
        templates: &'a TemplateCatalog,
        scan_members: &'a BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            declarations,
            templates,
            scan_members,
        }
    }

    /// Resolve every increment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateIncrementName`] if two increments share a name
    /// - [`ConfigError::InvalidTemplateReference`] for an unknown template id
    ///   (directly or through a scan)
    /// - [`ConfigError::InvalidScanReference`] for an unknown scan name
    /// - [`ConfigError::InvalidIncrementReference`] for an unknown nested increment
    /// - [`ConfigError::IncrementReferenceCycle`] for self- or mutually-recursive increments
    pub fn resolve(&self) -> Result<BTreeMap<String, Increment>, ConfigError> {
        let mut by_name: HashMap<&str, &IncrementDeclaration> =
            HashMap::with_capacity(self.declarations.len());
        for declaration in self.declarations {
            if by_name.insert(&declaration.name, declaration).is_some() {
                return Err(ConfigError::DuplicateIncrementName {
                    name: declaration.name.clone(),
                });
            }
        }

        let mut expansion = Expansion {
            resolver: self,
            by_name,
            resolved: HashMap::new(),
            visiting: Vec::new(),
        };

        let mut increments = BTreeMap::new();
        for declaration in self.declarations {
            let templates = expansion.expand(declaration)?;
            trace!("Increment '{}' has {} templates", declaration.name, templates.len());
            increments.insert(
                declaration.name.clone(),
                Increment {
                    name: declaration.name.clone(),
                    description: declaration.description.clone(),
                    templates,
                },
            );
        }

        info!("Resolved {} increments", increments.len());
        Ok(increments)
    }

    fn template(&self, increment: &str, id: &str) -> Result<Arc<Template>, ConfigError> {
        self.templates.get(id).cloned().ok_or_else(|| ConfigError::InvalidTemplateReference {
            increment: increment.to_string(),
            reference: id.to_string(),
            suggestion: closest_match(id, self.templates.keys().map(String::as_str)),
        })
    }
}

/// Scratch state of one [`IncrementResolver::resolve`] call.
struct Expansion<'r, 'a> {
    resolver: &'r IncrementResolver<'a>,
    by_name: HashMap<&'a str, &'a IncrementDeclaration>,
    resolved: HashMap<String, MemberSet>,
    visiting: Vec<String>,
}

impl<'a> Expansion<'_, 'a> {
    fn expand(&mut self, declaration: &'a IncrementDeclaration) -> Result<MemberSet, ConfigError> {
        if let Some(members) = self.resolved.get(&declaration.name) {
            return Ok(members.clone());
        }

        self.visiting.push(declaration.name.clone());
        let mut members = MemberSet::new();

        for reference in declaration.references() {
            match reference {
                IncrementReference::Template(id) => {
                    let template = self.resolver.template(&declaration.name, id)?;
                    members.insert(id.to_string(), template);
                }
                IncrementReference::Scan(scan) => {
                    let ids = self.resolver.scan_members.get(scan).ok_or_else(|| {
                        ConfigError::InvalidScanReference {
                            increment: declaration.name.clone(),
                            reference: scan.to_string(),
                            suggestion: closest_match(
                                scan,
                                self.resolver.scan_members.keys().map(String::as_str),
                            ),
                        }
                    })?;
                    for id in ids {
                        let template = self.resolver.template(&declaration.name, id)?;
                        members.insert(id.clone(), template);
                    }
                }
                IncrementReference::Increment(name) => {
                    if let Some(start) = self.visiting.iter().position(|v| v == name) {
                        let mut chain = self.visiting[start..].to_vec();
                        chain.push(name.to_string());
                        return Err(ConfigError::IncrementReferenceCycle {
                            chain: chain.join(" → "),
                        });
                    }

                    let Some(nested) = self.by_name.get(name).copied() else {
                        return Err(ConfigError::InvalidIncrementReference {
                            increment: declaration.name.clone(),
                            reference: name.to_string(),
                            suggestion: closest_match(name, self.by_name.keys().copied()),
                        });
                    };

                    members.extend(self.expand(nested)?);
                }
            }
        }

        self.visiting.pop();
        self.resolved.insert(declaration.name.clone(), members.clone());
        Ok(members)
    }
}
