use std::fs::create_dir_all;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::constants::{APPLICATION, ORGANIZATION, QUALIFIER};
use crate::errors::{file_operation_error, generic_error, Result};
use directories::ProjectDirs;

/// Shortens a string from the left, keeping its meaningful tail
///
/// Trailing path segments tell more than leading ones, so the start is
/// replaced with an ellipsis.
pub fn ellipsize_start(text: &str, max: usize) -> String {
    let length = text.chars().count();
    if length <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let tail: String = text.chars().skip(length - (max - 1)).collect();
    format!("…{tail}")
}

/// Shortens a string by cutting out its middle
pub fn ellipsize_middle(text: &str, max: usize) -> String {
    let length = text.chars().count();
    if length <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let left = (max - 1) / 2;
    let right = max - 1 - left;
    let head: String = text.chars().take(left).collect();
    let tail: String = text.chars().skip(length - right).collect();
    format!("{head}…{tail}")
}

/// Returns the first line of a possibly multi-line message
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Human readable label for a folder, relative to the run root
///
/// The root itself is labelled by its base name.
pub fn folder_label(root: &Path, folder: &Path) -> String {
    let relative = folder
        .strip_prefix(root)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    if !relative.is_empty() {
        return relative;
    }

    folder
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string())
}

/// Locks a mutex, recovering the data if another thread panicked while holding it
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn find_project_folder() -> Result<ProjectDirs> {
    let folder = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| generic_error("Failed to determine project directories"))?;

    if !folder.config_dir().exists() {
        create_dir_all(folder.config_dir()).map_err(|e| {
            file_operation_error(e, folder.config_dir().to_path_buf(), "create directory")
        })?;
    }
    Ok(folder)
}
