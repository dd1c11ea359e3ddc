//! Error handling for gencat
//!
//! Every failure of the resolution engine is a configuration error: the
//! declarations on disk (or the tree handed in by an embedding host) describe
//! something that cannot be materialized. The error system follows two rules:
//! 1. **Strongly-typed errors**: [`ConfigError`] has one variant per kind of
//!    configuration mistake, so callers can match on what went wrong.
//! 2. **Locating context**: each variant carries the identifier a user needs
//!    to find the offending declaration (scan label, increment name, colliding
//!    id, dangling reference, file name) without re-reading the whole file.
//!
//! # Error Kinds
//!
//! - **Loading**: [`ConfigError::ConfigurationNotFound`], [`ConfigError::FileSystemError`],
//!   [`ConfigError::MalformedConfiguration`]
//! - **Scanning**: [`ConfigError::UnreadableScanDirectory`], [`ConfigError::InvalidExclusionPattern`],
//!   [`ConfigError::DuplicateTemplateScanName`]
//! - **Template catalog**: [`ConfigError::DuplicateTemplateId`],
//!   [`ConfigError::UnhookedTemplateExtension`], [`ConfigError::DuplicateTemplateExtension`]
//! - **Increment catalog**: [`ConfigError::DuplicateIncrementName`],
//!   [`ConfigError::InvalidTemplateReference`], [`ConfigError::InvalidScanReference`],
//!   [`ConfigError::InvalidIncrementReference`], [`ConfigError::IncrementReferenceCycle`]
//!
//! None of these are retried or recovered inside the engine. Resolution either
//! returns complete catalogs or one of these errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gencat::core::{ConfigError, user_friendly_error};
//!
//! fn resolve() -> Result<(), ConfigError> {
//!     Err(ConfigError::DuplicateIncrementName {
//!         name: "services".to_string(),
//!     })
//! }
//!
//! if let Err(e) = resolve() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // colored error, details and suggestion on stderr
//! }
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The error type of every resolution operation.
///
/// Variants are grouped by the phase that detects them. Messages are written
/// for end users and always contain the identifier of the offending
/// declaration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No declaration file exists at the configuration root
    #[error("No template configuration found at {}", .path.display())]
    ConfigurationNotFound {
        /// Expected location of the declaration file
        path: PathBuf,
    },

    /// The declaration file exists but could not be read
    #[error("Failed to read template configuration {}", .path.display())]
    FileSystemError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The declaration tree is structurally invalid
    #[error("Malformed template configuration in {file}: {reason}")]
    MalformedConfiguration {
        /// Declaration file (or `<in-memory>` for trees handed in directly)
        file: String,
        /// What is wrong with it
        reason: String,
    },

    /// A scan's base directory is missing or could not be walked
    #[error("Template scan '{scan}' cannot read directory {}: {reason}", .path.display())]
    UnreadableScanDirectory {
        /// Label of the scan declaration
        scan: String,
        /// Directory (or entry) that failed
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// An exclusion glob of a scan does not compile
    #[error("Template scan '{scan}' has an invalid exclusion pattern '{pattern}': {reason}")]
    InvalidExclusionPattern {
        /// Label of the scan declaration
        scan: String,
        /// The offending pattern
        pattern: String,
        /// Glob compiler message
        reason: String,
    },

    /// Two scan declarations share a name
    #[error("Template scan name '{name}' is declared more than once")]
    DuplicateTemplateScanName {
        /// The shared name
        name: String,
    },

    /// Two declarations of the same kind produce the same template id
    #[error("Duplicate template id '{id}' for file '{file_name}': produced by {first} and {second}")]
    DuplicateTemplateId {
        /// The colliding id
        id: String,
        /// File name that produced the id the second time
        file_name: String,
        /// Source of the first declaration (e.g. `template scan #1 'a'`)
        first: String,
        /// Source of the second declaration
        second: String,
    },

    /// A template extension references an id absent from the catalog
    #[error("Template extension references unknown template '{reference}'{}", hint(.suggestion))]
    UnhookedTemplateExtension {
        /// The referenced id
        reference: String,
        /// Closest known id, if any is similar enough
        suggestion: Option<String>,
    },

    /// Two template extensions target the same id
    #[error("Template '{reference}' is extended more than once")]
    DuplicateTemplateExtension {
        /// The doubly-extended id
        reference: String,
    },

    /// Two increments share a name
    #[error("Increment name '{name}' is declared more than once")]
    DuplicateIncrementName {
        /// The shared name
        name: String,
    },

    /// An increment references a template id absent from the catalog
    #[error("Increment '{increment}' references unknown template '{reference}'{}", hint(.suggestion))]
    InvalidTemplateReference {
        /// Increment declaring the reference
        increment: String,
        /// The dangling template id
        reference: String,
        /// Closest known id, if any is similar enough
        suggestion: Option<String>,
    },

    /// An increment references a scan name that is not declared
    #[error("Increment '{increment}' references unknown template scan '{reference}'{}", hint(.suggestion))]
    InvalidScanReference {
        /// Increment declaring the reference
        increment: String,
        /// The dangling scan name
        reference: String,
        /// Closest known scan name, if any is similar enough
        suggestion: Option<String>,
    },

    /// An increment references an increment that is not declared
    #[error("Increment '{increment}' references unknown increment '{reference}'{}", hint(.suggestion))]
    InvalidIncrementReference {
        /// Increment declaring the reference
        increment: String,
        /// The dangling increment name
        reference: String,
        /// Closest known increment name, if any is similar enough
        suggestion: Option<String>,
    },

    /// The increment reference graph contains a cycle
    #[error("Increment reference cycle detected: {chain}")]
    IncrementReferenceCycle {
        /// The cycle, e.g. `a → b → a`
        chain: String,
    },
}

fn hint(suggestion: &Option<String>) -> String {
    suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default()
}

impl ConfigError {
    /// Shorthand for a [`ConfigError::MalformedConfiguration`].
    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedConfiguration {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Short, stable name of the error kind, used by the CLI and in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationNotFound {
                ..
            } => "ConfigurationNotFound",
            Self::FileSystemError {
                ..
            } => "FileSystemError",
            Self::MalformedConfiguration {
                ..
            } => "MalformedConfiguration",
            Self::UnreadableScanDirectory {
                ..
            } => "UnreadableScanDirectory",
            Self::InvalidExclusionPattern {
                ..
            } => "InvalidExclusionPattern",
            Self::DuplicateTemplateScanName {
                ..
            } => "DuplicateTemplateScanName",
            Self::DuplicateTemplateId {
                ..
            } => "DuplicateTemplateId",
            Self::UnhookedTemplateExtension {
                ..
            } => "UnhookedTemplateExtension",
            Self::DuplicateTemplateExtension {
                ..
            } => "DuplicateTemplateExtension",
            Self::DuplicateIncrementName {
                ..
            } => "DuplicateIncrementName",
            Self::InvalidTemplateReference {
                ..
            } => "InvalidTemplateReference",
            Self::InvalidScanReference {
                ..
            } => "InvalidScanReference",
            Self::InvalidIncrementReference {
                ..
            } => "InvalidIncrementReference",
            Self::IncrementReferenceCycle {
                ..
            } => "IncrementReferenceCycle",
        }
    }
}

/// A [`ConfigError`] enriched with user-facing details and a suggestion.
///
/// Produced by [`user_friendly_error`] and rendered by the CLI.
#[derive(Debug)]
pub struct ErrorContext {
    /// The message of the underlying error
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from any displayable error.
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    ///
    /// Suggestions are actionable steps and are displayed in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, displayed in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with kind-specific guidance.
///
/// The full `anyhow` context chain is kept in the message so that CLI
/// wrappers like "failed to load templates" are not lost.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let ctx = ErrorContext {
        message: format!("{error:#}"),
        suggestion: None,
        details: None,
    };

    let Some(config_error) = error.chain().find_map(|e| e.downcast_ref::<ConfigError>()) else {
        return ctx;
    };

    match config_error {
        ConfigError::ConfigurationNotFound {
            ..
        } => ctx
            .with_suggestion("Pass the directory containing templates.toml with --root")
            .with_details("Every configuration root must contain a templates.toml declaration file"),
        ConfigError::FileSystemError {
            source,
            ..
        } => ctx.with_details(source.to_string()),
        ConfigError::MalformedConfiguration {
            ..
        } => ctx
            .with_suggestion("Check the TOML syntax and the key names of templates.toml")
            .with_details("Unknown keys are rejected so that typos do not silently change resolution"),
        ConfigError::UnreadableScanDirectory {
            ..
        } => ctx
            .with_suggestion("Check the template-path of the scan, it is relative to the configuration root")
            .with_details("Scans never skip unreadable directories, an incomplete scan would drop templates"),
        ConfigError::InvalidExclusionPattern {
            ..
        } => ctx.with_suggestion("Use glob syntax such as '**/*.bak' or 'internal/*'"),
        ConfigError::DuplicateTemplateScanName {
            ..
        } => ctx.with_suggestion("Give every template scan a unique name"),
        ConfigError::DuplicateTemplateId {
            ..
        } => ctx
            .with_suggestion("Use distinct template-name-prefix values or exclude one of the files")
            .with_details("Only an explicit [[template]] declaration may replace a scanned template"),
        ConfigError::UnhookedTemplateExtension {
            ..
        } => ctx.with_suggestion("Point 'ref' at an explicit template name or a scanned id (prefix + file name)"),
        ConfigError::DuplicateTemplateExtension {
            ..
        } => ctx.with_suggestion("Merge both [[template-extension]] blocks into one"),
        ConfigError::DuplicateIncrementName {
            ..
        } => ctx.with_suggestion("Give every increment a unique name"),
        ConfigError::InvalidTemplateReference {
            ..
        }
        | ConfigError::InvalidScanReference {
            ..
        }
        | ConfigError::InvalidIncrementReference {
            ..
        } => ctx.with_suggestion("Run 'gencat templates' to list the ids that can be referenced"),
        ConfigError::IncrementReferenceCycle {
            ..
        } => ctx
            .with_suggestion("Remove one of the nested increment references on the cycle")
            .with_details("Increments may include other increments, but never themselves"),
    }
}
