//! Test utilities for gencat
//!
//! Helpers for building configuration roots on disk and for enabling logging
//! inside tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use gencat::test_utils::{ConfigFixture, test_trigger};
//! use gencat::context::RelocationRules;
//!
//! let fixture = ConfigFixture::new()
//!     .template_file("foo/FooClass.java.ftl")
//!     .declaration(r#"
//! [[template-scan]]
//! name = "foo"
//! template-path = "foo"
//! "#);
//!
//! let reader = fixture.reader().unwrap();
//! let templates = reader.load_templates(&test_trigger(), &RelocationRules::new()).unwrap();
//! assert!(templates.contains_key("FooClass.java"));
//! ```

use crate::constants::DECLARATION_FILE_NAME;
use crate::context::Trigger;
use crate::core::ConfigError;
use crate::reader::ConfigurationReader;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, tests stay silent.
///
/// ```bash
/// RUST_LOG=gencat=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Trigger used by tests: id `test`, type `java`, charset `UTF-8`.
pub fn test_trigger() -> Trigger {
    Trigger::new("test", "java", "test_templates", "UTF-8")
}

/// A configuration root in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct ConfigFixture {
    temp: TempDir,
}

impl ConfigFixture {
    /// Create an empty configuration root (no declaration file yet).
    ///
    /// # Panics
    ///
    /// If the temporary directory cannot be created.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Write `templates.toml`.
    #[must_use]
    pub fn declaration(self, content: &str) -> Self {
        self.write(DECLARATION_FILE_NAME, content)
    }

    /// Create a template file with placeholder content.
    #[must_use]
    pub fn template_file(self, relative: &str) -> Self {
        let content = format!("<#-- {relative} -->\n");
        self.write(relative, &content)
    }

    /// Create several template files.
    #[must_use]
    pub fn template_files(self, relatives: &[&str]) -> Self {
        relatives.iter().fold(self, |fixture, relative| fixture.template_file(relative))
    }

    /// Create an empty directory.
    #[must_use]
    pub fn directory(self, relative: &str) -> Self {
        fs::create_dir_all(self.temp.path().join(relative)).expect("failed to create directory");
        self
    }

    /// Write an arbitrary file below the root.
    ///
    /// # Panics
    ///
    /// If the file cannot be written.
    #[must_use]
    pub fn write(self, relative: &str, content: &str) -> Self {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        self
    }

    /// The configuration root.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path of a file below the root.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Open the root with [`ConfigurationReader::new`].
    ///
    /// # Errors
    ///
    /// Whatever the reader reports for this root.
    pub fn reader(&self) -> Result<ConfigurationReader, ConfigError> {
        ConfigurationReader::new(self.temp.path())
    }
}
