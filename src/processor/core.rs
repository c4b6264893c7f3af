//! Core processor functionality
//!
//! This module contains the core Processor struct and its basic methods.

use std::path::{Path, PathBuf};

/// Handles the rename of a single file
///
/// The Processor struct holds the source path of a file and the target path
/// it should be moved to once its prefix has been applied.
#[derive(Debug, Clone)]
pub struct Processor {
    /// The source path of the file being processed
    pub(super) source: PathBuf,
    /// The target path the file will be renamed to
    pub(super) target: PathBuf,
}

impl Processor {
    /// Creates a new ProcessorBuilder for building a Processor instance
    ///
    /// # Arguments
    /// * `file` - The path to the file to be processed
    ///
    /// # Returns
    /// * `ProcessorBuilder` - A new ProcessorBuilder instance with the source set to the given file
    pub fn builder(file: &Path) -> ProcessorBuilder {
        ProcessorBuilder::new(file)
    }

    /// Gets a reference to the source path
    pub fn source(&self) -> &PathBuf {
        &self.source
    }

    /// Gets a reference to the target path
    pub fn target(&self) -> &PathBuf {
        &self.target
    }
}

/// Builder for creating Processor instances
///
/// This struct follows the builder pattern to provide a more readable
/// and flexible way to create Processor instances.
#[derive(Debug, Clone)]
pub struct ProcessorBuilder {
    /// The source path of the file being processed
    source: PathBuf,
    /// The target path the file will be renamed to
    target: PathBuf,
}

impl ProcessorBuilder {
    /// Creates a new ProcessorBuilder instance for the given file
    ///
    /// The target starts out equal to the source, so a processor built
    /// without a target is a no-op.
    pub fn new(file: &Path) -> ProcessorBuilder {
        ProcessorBuilder {
            source: file.to_path_buf(),
            target: file.to_path_buf(),
        }
    }

    /// Sets the target path
    ///
    /// # Arguments
    /// * `target` - The target path to set
    ///
    /// # Returns
    /// * `ProcessorBuilder` - The builder instance for method chaining
    pub fn target(mut self, target: PathBuf) -> ProcessorBuilder {
        self.target = target;
        self
    }

    /// Builds the Processor instance
    pub fn build(self) -> Processor {
        Processor {
            source: self.source,
            target: self.target,
        }
    }
}
