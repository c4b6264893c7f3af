//! Path resolution functionality
//!
//! Existence and type checks for the run target, plus the rename primitive
//! used by the rename workers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{file_operation_error, path_not_found_error, Result};

/// What a path points at, without following symbolic links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
    Other,
}

/// Makes `path` absolute against the current directory
///
/// Symbolic links are not resolved.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| file_operation_error(e, path.to_path_buf(), "resolve"))
}

/// Checks that `path` exists and reports what it is
///
/// # Errors
/// Returns a path-not-found error if nothing exists at `path`
pub fn resolve_kind(path: &Path) -> Result<PathKind> {
    if fs::metadata(path).is_err() {
        return Err(path_not_found_error(path.to_path_buf()));
    }

    let metadata = fs::symlink_metadata(path)
        .map_err(|e| file_operation_error(e, path.to_path_buf(), "inspect"))?;

    Ok(if metadata.is_file() {
        PathKind::File
    } else if metadata.is_dir() {
        PathKind::Directory
    } else {
        PathKind::Other
    })
}

/// Moves `from` to `to` with a single rename call
///
/// An existing destination is never overwritten.
pub fn rename_path(from: &Path, to: &Path) -> io::Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", to.display()),
        ));
    }
    fs::rename(from, to)
}
