//! File operation functionality
//!
//! This module contains the rename of a single file to its prefixed name.

use std::path::{Path, PathBuf};

use log::trace;

use crate::discovery::rename_path;
use crate::errors::{file_operation_error, Result};

use super::core::Processor;

/// Outcome of a rename that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file now lives at `to`
    Renamed { from: PathBuf, to: PathBuf },
    /// Source and target were the same path; nothing was touched
    Unchanged,
}

impl Processor {
    /// Performs the rename from source to target
    ///
    /// # Returns
    /// * `Result<RenameOutcome>` - What happened to the file, or an error
    ///
    /// # Errors
    /// Returns an error carrying the underlying I/O error if the destination
    /// exists or the rename itself fails. The file is left untouched then.
    pub fn perform_rename(&self) -> Result<RenameOutcome> {
        if !self.is_changed() {
            return Ok(RenameOutcome::Unchanged);
        }

        rename_path(&self.source, &self.target)
            .map_err(|e| file_operation_error(e, self.source.clone(), "rename"))?;

        trace!(
            "Renamed {} -> {}",
            self.source.display(),
            self.target.display()
        );

        Ok(RenameOutcome::Renamed {
            from: self.source.clone(),
            to: self.target.clone(),
        })
    }
}

/// Renames `file` to `prefix + file name` inside the same folder
///
/// # Errors
/// Returns a typed error for any failure; the caller always gets a value back
/// and nothing is raised past this point.
pub fn rename_one(file: &Path, prefix: &str) -> Result<RenameOutcome> {
    Processor::builder(file)
        .build()
        .with_prefix(prefix)?
        .perform_rename()
}
