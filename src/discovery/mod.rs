//! File discovery module
//!
//! This module contains components for listing folders and files and for
//! resolving and renaming paths.

mod resolver;
mod scanner;

pub use resolver::{PathKind, absolute_path, rename_path, resolve_kind};
pub use scanner::{Listing, list_files, list_folders};
