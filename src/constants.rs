//! Global constants used throughout the gencat codebase.
//!
//! File names, well-known variable names and sentinel values that are shared
//! between the declaration loader, the resolution phases and the CLI.

/// Name of the declaration file expected at every configuration root.
pub const DECLARATION_FILE_NAME: &str = "templates.toml";

/// Template-engine suffix stripped from scanned file names when no
/// `template-extension` is configured.
///
/// `foo/FooClass.java.ftl` is discovered as `FooClass.java`.
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "ftl";

/// Charset used when neither the trigger nor a declaration names one.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Name of the derived package variable of a scan without
/// `package-variable`.
pub const DEFAULT_PACKAGE_VARIABLE: &str = "package";

/// Value of the derived package variable when a template lives directly in the
/// package root of its scan.
pub const PACKAGE_ROOT_SENTINEL: &str = "root";

/// Variable holding the relocation expression of a relocated template.
pub const RELOCATE_VARIABLE: &str = "relocate";

/// Placeholder appended to the relocation variable. It stands for the path of
/// the template relative to its destination and is substituted downstream.
pub const CWD_PLACEHOLDER: &str = "${cwd}";

/// Maximum edit distance, in percent of the reference length, for a known id
/// to be offered as a "did you mean" hint.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;
