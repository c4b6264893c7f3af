//! On-disk shape of a run log

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::utils::first_line;

/// A failure recorded during a run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// File or folder the failure belongs to
    pub file: String,
    /// Short failure tag, see [`Error::code`]
    pub code: String,
    /// Human readable description
    pub message: String,
}

impl ErrorRecord {
    pub fn new(file: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorRecord {
            file: file.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Builds a record from an error that happened while handling `path`
    pub fn from_error(path: &Path, error: &Error) -> Self {
        let message = match error {
            Error::FileOperation { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        ErrorRecord::new(
            path.to_string_lossy(),
            error.code(),
            first_line(&message).to_string(),
        )
    }
}

/// A successful rename
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenameRecord {
    pub original_path: String,
    pub new_path: String,
}

/// The JSON document written for every run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunLogDocument {
    pub started_at: DateTime<Local>,
    /// Only set by the final flush
    pub finished_at: Option<DateTime<Local>>,
    pub working_path: String,
    pub total_renamed: usize,
    pub errors_count: usize,
    pub errors: Vec<ErrorRecord>,
    /// Original path to new path; left out in summary mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renamed: Option<BTreeMap<String, String>>,
}
