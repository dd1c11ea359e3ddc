//! Show the nested reference structure of an increment.
//!
//! ```text
//! └── increment:all
//!     ├── template:EntityDao.java
//!     ├── scan:entity_scan
//!     └── increment:logic
//!         └── template:Service.java
//! ```
//!
//! The tree is built from declarations only, so it can be printed for a
//! configuration whose increments do not resolve (e.g. because of a cycle).

use anyhow::{Result, bail};
use clap::Args;
use std::path::Path;
use tracing::warn;

use crate::cli::common::load_reader;
use crate::core::closest_match;
use crate::resolver::ReferenceNode;

/// Arguments of `gencat tree`.
#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Increment to show
    increment: String,
}

impl TreeCommand {
    pub fn execute(self, root: &Path) -> Result<()> {
        let reader = load_reader(root)?;
        let graph = reader.increment_graph();

        if !graph.contains_increment(&self.increment) {
            let names = reader.declarations().increments.iter().map(|i| i.name.as_str());
            match closest_match(&self.increment, names) {
                Some(hint) => bail!("Unknown increment '{}' (did you mean '{hint}'?)", self.increment),
                None => bail!("Unknown increment '{}'", self.increment),
            }
        }

        if let Err(e) = graph.detect_cycles() {
            warn!("{e}");
        }

        print!("{}", graph.to_tree_string(&ReferenceNode::increment(&self.increment)));
        Ok(())
    }
}
