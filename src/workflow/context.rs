//! Workflow context
//!
//! This module defines the results passed back from folder tasks and the
//! summary of a whole run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::run_log::ErrorRecord;

/// Outcome of one folder task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderResult {
    /// Label the folder is reported under
    pub label: String,
    /// Files found directly inside the folder
    pub processed: usize,
    /// Files that ended up with the prefix
    pub renamed: usize,
    /// Files whose rename failed
    pub failed: usize,
}

/// What happened to the run log at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    /// The log was written to this file
    Written(PathBuf),
    /// Logging was switched off
    Disabled,
    /// Nothing was renamed and nothing failed
    Empty,
    /// The final write failed
    Failed(String),
}

impl LogOutcome {
    /// Log file, if one was written
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            LogOutcome::Written(path) => Some(path),
            _ => None,
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Absolute path the run was started on
    pub target: PathBuf,
    /// Folder tasks allowed to run at the same time
    pub concurrency: usize,
    /// Files processed per folder label, only for folders with files
    pub counts: BTreeMap<String, usize>,
    /// Successful renames
    pub renamed: usize,
    /// Every failure recorded during the run
    pub errors: Vec<ErrorRecord>,
    /// Fate of the run log
    pub log: LogOutcome,
}

impl RunSummary {
    pub(crate) fn new(target: PathBuf, concurrency: usize) -> Self {
        RunSummary {
            target,
            concurrency,
            counts: BTreeMap::new(),
            renamed: 0,
            errors: Vec::new(),
            log: LogOutcome::Empty,
        }
    }

    /// Adds a folder's result to the totals
    pub fn add_folder(&mut self, result: &FolderResult) {
        self.renamed += result.renamed;
        if result.processed > 0 {
            *self.counts.entry(result.label.clone()).or_insert(0) += result.processed;
        }
    }

    /// Total number of processed files
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(label: &str, processed: usize, renamed: usize) -> FolderResult {
        FolderResult {
            label: label.to_string(),
            processed,
            renamed,
            failed: processed - renamed,
        }
    }

    #[test]
    fn test_add_folder_skips_empty_folders() {
        let mut summary = RunSummary::new(PathBuf::from("/data"), 1);

        summary.add_folder(&folder("A", 2, 2));
        summary.add_folder(&folder("B", 1, 0));
        summary.add_folder(&folder("C", 0, 0));

        assert_eq!(summary.counts.len(), 2);
        assert_eq!(summary.counts["A"], 2);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.renamed, 2);
    }

    #[test]
    fn test_same_label_accumulates() {
        let mut summary = RunSummary::new(PathBuf::from("/data"), 1);

        summary.add_folder(&folder("A", 2, 2));
        summary.add_folder(&folder("A", 3, 3));

        assert_eq!(summary.counts["A"], 5);
    }

    #[test]
    fn test_log_outcome_path() {
        let written = LogOutcome::Written(PathBuf::from("/logs/run.json"));
        assert_eq!(written.path(), Some(&PathBuf::from("/logs/run.json")));
        assert_eq!(LogOutcome::Disabled.path(), None);
    }
}
