//! File processing module
//!
//! This module contains the rename worker: deriving a file's prefixed name
//! and moving it there.

mod core;
mod file_operations;
mod path_handling;

pub use core::{Processor, ProcessorBuilder};
pub use file_operations::{RenameOutcome, rename_one};
