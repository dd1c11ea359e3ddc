//! Third phase: path-derived variables and relocation.
//!
//! Runs after extensions so that relocation sees the final target path.
//!
//! # Package Variable
//!
//! Every scanned template gets a variable holding its directory relative to
//! the scan's package root, dot-joined: `foo/bar` becomes `foo.bar`. A
//! template directly in the package root gets the sentinel `root`. Templates
//! outside the package root get no variable. The variable is named by the
//! scan's `package-variable`, or `package` when unset. Variables declared
//! explicitly or by an extension win.
//!
//! Scans are looked up by their position in the declaration, since two scans
//! may share a label.
//!
//! # Relocation
//!
//! When a [`RelocationRules`] entry applies to a template (see
//! [`RelocationRules::lookup`]) with a non-empty expression `expr`:
//!
//! - `relocate` = `expr` + scan destination path + `/` + `${cwd}`
//!   (explicit templates: `expr` + `${cwd}`)
//! - target path = `expr` + target path
//!
//! The pre-relocation target path is kept as the unresolved template path.

use crate::catalog::DraftCatalog;
use crate::constants::{CWD_PLACEHOLDER, DEFAULT_PACKAGE_VARIABLE, PACKAGE_ROOT_SENTINEL, RELOCATE_VARIABLE};
use crate::context::{RelocationRules, Trigger};
use crate::declaration::TemplateScanDeclaration;
use crate::models::{Template, TemplateOrigin};
use tracing::{debug, trace};

/// Derives package variables and applies relocation.
pub struct PathVariableDeriver<'a> {
    scans: &'a [TemplateScanDeclaration],
    trigger: &'a Trigger,
    relocations: &'a RelocationRules,
}

impl<'a> PathVariableDeriver<'a> {
    /// Create a deriver for the scans of one configuration root.
    pub fn new(
        scans: &'a [TemplateScanDeclaration],
        trigger: &'a Trigger,
        relocations: &'a RelocationRules,
    ) -> Self {
        Self {
            scans,
            trigger,
            relocations,
        }
    }

    /// Finalize variables and target paths of every template.
    pub fn derive(&self, mut catalog: DraftCatalog) -> DraftCatalog {
        let mut relocated = 0usize;
        for template in catalog.values_mut() {
            let scan = match &template.origin {
                TemplateOrigin::Scan {
                    index,
                    directory,
                    ..
                } => self.scans.get(*index).map(|declaration| (declaration, directory.clone())),
                TemplateOrigin::Explicit => None,
            };

            if let Some((declaration, directory)) = &scan {
                let variable = declaration.package_variable.as_deref().unwrap_or(DEFAULT_PACKAGE_VARIABLE);
                let package_root = declaration.package_root.as_deref().unwrap_or_default();
                match package_value(package_root, directory) {
                    Some(value) => {
                        trace!("Package variable of '{}': {}={}", template.name, variable, value);
                        template.variables.entry(variable.to_string()).or_insert(value);
                    }
                    None => trace!(
                        "'{}' is outside package root '{}' of scan '{}'",
                        template.name,
                        package_root,
                        declaration.label()
                    ),
                }
            }

            template.unresolved_template_path.clone_from(&template.unresolved_target_path);

            let destination = scan.as_ref().map(|(declaration, _)| declaration.destination_path.as_str());
            if self.relocate(template, destination) {
                relocated += 1;
            }
        }

        if relocated > 0 {
            debug!("Relocated {} templates", relocated);
        }
        catalog
    }

    fn relocate(&self, template: &mut Template, scan_destination: Option<&str>) -> bool {
        let Some(expression) = self.relocations.lookup(template.origin.scan(), self.trigger) else {
            return false;
        };
        if expression.is_empty() {
            trace!("Relocation of '{}' disabled by empty rule", template.name);
            return false;
        }

        let mut relocate = expression.to_string();
        if let Some(destination) = scan_destination.map(|d| d.trim_matches('/'))
            && !destination.is_empty()
        {
            relocate.push_str(destination);
            relocate.push('/');
        }
        relocate.push_str(CWD_PLACEHOLDER);

        template.unresolved_target_path = format!("{expression}{}", template.unresolved_target_path);
        template.variables.insert(RELOCATE_VARIABLE.to_string(), relocate);
        true
    }
}

/// Dot-joined path of `directory` below `package_root`, both relative to the
/// scan base.
fn package_value(package_root: &str, directory: &str) -> Option<String> {
    let root = package_root.trim_matches('/');
    let root = if root == "." {
        ""
    } else {
        root
    };
    let directory = directory.trim_matches('/');

    if directory == root {
        return Some(PACKAGE_ROOT_SENTINEL.to_string());
    }

    let below = if root.is_empty() {
        directory
    } else {
        directory.strip_prefix(root)?.strip_prefix('/')?
    };
    Some(below.replace('/', "."))
}
