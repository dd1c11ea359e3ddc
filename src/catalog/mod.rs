//! Template catalog construction.
//!
//! A template catalog is built in three phases, each taking the previous
//! catalog by value and returning the refined one:
//!
//! 1. [`TemplateCatalogBuilder`]: explicit declarations plus scan drafts,
//!    explicit declarations shadow scanned ones with the same id
//! 2. [`ExtensionApplier`]: attribute-level overrides from
//!    `[[template-extension]]` blocks
//! 3. [`PathVariableDeriver`]: package variables and relocation
//!
//! Only after the last phase are templates frozen into
//! [`TemplateCatalog`](crate::models::TemplateCatalog) entries.

mod builder;
mod extension;
mod path_variables;

pub use builder::TemplateCatalogBuilder;
pub use extension::ExtensionApplier;
pub use path_variables::PathVariableDeriver;

use crate::models::{Template, TemplateCatalog};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Catalog between construction phases, still mutable by value.
pub type DraftCatalog = BTreeMap<String, Template>;

/// Freeze a finished catalog so templates can be shared by increments.
pub fn freeze(catalog: DraftCatalog) -> TemplateCatalog {
    catalog.into_iter().map(|(id, template)| (id, Arc::new(template))).collect()
}
