//! gencat - template configuration resolution for code generators
//!
//! A code generator ships *configuration roots*: directories holding template
//! files plus a `templates.toml` that declares which templates exist, where
//! their output goes and how they are grouped. gencat turns such a root into
//! two immutable catalogs:
//!
//! - a **template catalog** mapping template ids to fully resolved
//!   [`Template`](models::Template)s (source path, unresolved target path,
//!   merge strategy, charset, variables)
//! - an **increment catalog** mapping increment ids to flattened sets of
//!   templates
//!
//! Nothing is rendered or written. Target paths keep their `${...}`
//! placeholders for a later stage to substitute.
//!
//! # Resolution Pipeline
//!
//! 1. [`declaration`] - parse and structurally validate `templates.toml`
//! 2. [`scan`] - walk every `[[template-scan]]` directory into drafts
//! 3. [`catalog`] - merge explicit templates and drafts, apply
//!    `[[template-extension]]` overrides, derive package variables and relocate
//! 4. [`resolver`] - expand `[[increment]]` references into template sets
//!
//! [`reader::ConfigurationReader`] runs steps 1 and 2 once at construction and
//! steps 3 and 4 on demand for a caller-supplied [`context::Trigger`].
//!
//! # Modules
//!
//! - [`cli`] - the `gencat` command-line front end
//! - [`context`] - trigger and relocation rules supplied by the caller
//! - [`core`] - error types and error-message helpers
//! - [`models`] - resolved templates and increments
//! - [`pattern`] - exclusion globs and path safety checks
//!
//! # Declaration Format
//!
//! ```toml
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
//!
//! [[increment]]
//! name = "all"
//! description = "All foo templates"
//! template-scans = ["foo_scan"]
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! gencat --root templates/crud_java templates
//! gencat --root templates/crud_java --relocate foo_scan=../api/ increments --format json
//! gencat --root templates/crud_java validate
//! ```

// Resolution engine
pub mod catalog;
pub mod context;
pub mod declaration;
pub mod reader;
pub mod resolver;
pub mod scan;

// Shared types
pub mod constants;
pub mod core;
pub mod models;
pub mod pattern;

// Front end
pub mod cli;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
