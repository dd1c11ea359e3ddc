//! Glob exclusions and path safety for template scans.
//!
//! Scans discover every regular file under their base directory. Exclusion
//! patterns remove files from that set before any template is synthesized.
//!
//! # Pattern Syntax
//!
//! Standard glob patterns, matched against the file path relative to the scan
//! base (always with `/` separators) and against the bare file name:
//!
//! - `*` matches any sequence of characters
//! - `**` matches any sequence of path components
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match character sets and ranges
//!
//! ```toml
//! [[template-scan]]
//! template-path = "java"
//! exclude = ["**/*.bak", "internal/*", ".*"]
//! ```
//!
//! # Path Safety
//!
//! Template paths in declarations must stay inside the configuration root:
//! [`validate_path_safety`] rejects absolute paths and `..` components.

use glob::Pattern;
use std::path::Path;
use tracing::trace;

/// Compiled exclusion patterns of one scan.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<Pattern>,
}

impl ExclusionSet {
    /// Compile a list of glob patterns.
    ///
    /// # Errors
    ///
    /// Returns the offending pattern and the glob compiler message for the
    /// first pattern that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, (String, String)> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|e| (p.to_string(), e.msg.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
        })
    }

    /// Whether the file at `relative_path` (relative to the scan base, `/`
    /// separated) is excluded.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);

        let excluded = self.patterns.iter().any(|p| p.matches(relative_path) || p.matches(file_name));
        if excluded {
            trace!("Excluded by pattern: {}", relative_path);
        }
        excluded
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Validate that a declared path stays inside the configuration root.
///
/// # Errors
///
/// Returns a human-readable reason if the path is absolute (Unix `/...`,
/// Windows drive letters or `\\` prefixes) or contains a `..` component.
pub fn validate_path_safety(path: &str) -> Result<(), String> {
    if path.split(['/', '\\']).any(|component| component == "..") {
        return Err(format!("path '{path}' contains a parent-directory component (..)"));
    }

    if path.starts_with('/') || path.starts_with('\\') || Path::new(path).is_absolute() {
        return Err(format!("path '{path}' is absolute"));
    }

    if path.len() >= 2 && path.as_bytes()[1] == b':' && path.as_bytes()[0].is_ascii_alphabetic() {
        return Err(format!("path '{path}' is absolute"));
    }

    Ok(())
}

/// Join two `/`-separated path fragments, ignoring empty and `.` parts.
///
/// ```rust
/// use gencat::pattern::join_slash;
///
/// assert_eq!(join_slash("src/main/java/", "foo/Foo.java"), "src/main/java/foo/Foo.java");
/// assert_eq!(join_slash("", "Foo.java"), "Foo.java");
/// assert_eq!(join_slash(".", "foo"), "foo");
/// assert_eq!(join_slash("src", ""), "src");
/// ```
pub fn join_slash(base: &str, tail: &str) -> String {
    let base = base.trim_end_matches('/');
    let tail = tail.trim_start_matches('/');

    match (base, tail) {
        ("" | ".", t) => t.to_string(),
        (b, "") => b.to_string(),
        (b, t) => format!("{b}/{t}"),
    }
}
