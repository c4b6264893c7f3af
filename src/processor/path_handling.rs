//! Path handling functionality
//!
//! This module contains methods for deriving the prefixed target path of a
//! file and comparing it with the source.

use std::ffi::{OsStr, OsString};

use crate::errors::{path_operation_error, Result};

use super::core::Processor;

impl Processor {
    /// Points the target at `prefix + file name` inside the source's folder
    ///
    /// # Errors
    /// Returns an error if the source has no file name component
    pub fn with_prefix(mut self, prefix: &str) -> Result<Processor> {
        let file_name = self.source_filename()?;

        let mut prefixed = OsString::from(prefix);
        prefixed.push(file_name);

        self.target = self.source.with_file_name(prefixed);
        Ok(self)
    }

    /// Checks if the target differs from the source
    pub fn is_changed(&self) -> bool {
        self.source != self.target
    }

    /// Gets the file name component of the source path
    pub(crate) fn source_filename(&self) -> Result<&OsStr> {
        self.source
            .file_name()
            .ok_or_else(|| path_operation_error(self.source.clone(), "get filename"))
    }
}
