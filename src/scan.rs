//! Directory walking for `[[template-scan]]` declarations.
//!
//! A scan turns every regular file under its base directory into a
//! [`TemplateDraft`]. Drafts are not templates yet: they have no charset
//! default and may still collide with each other or be shadowed by explicit
//! declarations. The catalog builder settles that.
//!
//! # Synthesized Attributes
//!
//! For a file `foo/bar/BarClass.java.ftl` found by a scan with
//! `template-path = "foo"`, `template-name-prefix = "prefix_"` and
//! `destination-path = "src/main/java/foo"`:
//!
//! | attribute | value |
//! |-----------|-------|
//! | id | `prefix_BarClass.java` |
//! | relative template path | `foo/bar/BarClass.java.ftl` |
//! | target path | `src/main/java/foo/bar/BarClass.java` |
//!
//! The template-engine suffix (`.ftl` unless configured otherwise) is
//! stripped from the id and the target path only.
//!
//! Files are visited in file-name order, so the same tree always produces the
//! same drafts. Symlinks are followed; a link cycle is an unreadable scan
//! directory rather than a silently skipped entry.

use crate::core::ConfigError;
use crate::declaration::TemplateScanDeclaration;
use crate::models::TemplateOrigin;
use crate::pattern::{ExclusionSet, join_slash};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// A template synthesized from one discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    /// Synthesized id: prefix plus stripped file name.
    pub id: String,
    /// Discovered file name, as found on disk.
    pub file_name: String,
    /// Source path relative to the configuration root.
    pub relative_template_path: String,
    /// Source path on disk.
    pub absolute_template_path: PathBuf,
    /// Destination path with the discovered sub-path appended.
    pub unresolved_target_path: String,
    /// Merge strategy of the scan.
    pub merge_strategy: Option<String>,
    /// Charset of the scan; `None` inherits the trigger default.
    pub target_charset: Option<String>,
    /// Scan and sub-directory that produced the draft.
    pub origin: TemplateOrigin,
}

impl TemplateDraft {
    /// Label of the scan that produced this draft.
    pub fn scan(&self) -> &str {
        self.origin.scan().unwrap_or_default()
    }
}

/// Walks scan base directories below one configuration root.
#[derive(Debug, Clone)]
pub struct ScanEnumerator {
    root: PathBuf,
    template_suffix: String,
}

impl ScanEnumerator {
    /// Create an enumerator for `root`, stripping `.{template_extension}`
    /// from discovered file names.
    pub fn new(root: impl Into<PathBuf>, template_extension: &str) -> Self {
        Self {
            root: root.into(),
            template_suffix: format!(".{template_extension}"),
        }
    }

    /// Enumerate the drafts of the scan declared at position `index`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnreadableScanDirectory`] if the base directory is
    ///   missing, is not a directory, or any entry below it cannot be read
    /// - [`ConfigError::InvalidExclusionPattern`] if an exclusion glob does
    ///   not compile
    pub fn enumerate(
        &self,
        index: usize,
        scan: &TemplateScanDeclaration,
    ) -> Result<Vec<TemplateDraft>, ConfigError> {
        let label = scan.label();
        let base = self.root.join(&scan.template_path);

        if !base.is_dir() {
            let reason = if base.exists() {
                "not a directory"
            } else {
                "directory does not exist"
            };
            return Err(ConfigError::UnreadableScanDirectory {
                scan: label.to_string(),
                path: base,
                reason: reason.to_string(),
            });
        }

        let exclusions = ExclusionSet::new(&scan.exclude).map_err(|(pattern, reason)| {
            ConfigError::InvalidExclusionPattern {
                scan: label.to_string(),
                pattern,
                reason,
            }
        })?;

        debug!("Scanning '{}' in {}", label, base.display());

        let mut drafts = Vec::new();
        for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| ConfigError::UnreadableScanDirectory {
                scan: label.to_string(),
                path: e.path().map_or_else(|| base.clone(), Path::to_path_buf),
                reason: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&base) else {
                continue;
            };
            let relative = slash_path(relative);

            if exclusions.is_excluded(&relative) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let directory = relative.rsplit_once('/').map(|(dir, _)| dir).unwrap_or_default();
            let stripped = file_name.strip_suffix(&self.template_suffix).unwrap_or(&file_name);

            let draft = TemplateDraft {
                id: format!("{}{}", scan.template_name_prefix, stripped),
                relative_template_path: join_slash(&scan.template_path, &relative),
                absolute_template_path: entry.path().to_path_buf(),
                unresolved_target_path: join_slash(&scan.destination_path, &join_slash(directory, stripped)),
                merge_strategy: scan.merge_strategy.clone(),
                target_charset: scan.target_charset.clone(),
                origin: TemplateOrigin::Scan {
                    scan: label.to_string(),
                    index,
                    directory: directory.to_string(),
                },
                file_name,
            };
            trace!("Discovered '{}' -> {}", draft.id, draft.unresolved_target_path);
            drafts.push(draft);
        }

        if drafts.is_empty() {
            warn!("Template scan '{}' found no templates in {}", label, base.display());
        } else {
            debug!("Template scan '{}' found {} templates", label, drafts.len());
        }

        Ok(drafts)
    }
}

fn slash_path(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}
