//! Configuration data structures
//!
//! This module contains the data structures for configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_FILE_JOBS, DEFAULT_FILE_PATTERN, DEFAULT_FLUSH_THRESHOLD, DEFAULT_LOG_KEEP,
    DEFAULT_LOG_MAX_AGE_DAYS, DEFAULT_LOG_MAX_MB,
};

/// Settings for one uniquifier run
///
/// Every field has a default, so a configuration file only needs to name
/// the values it changes.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Folders processed at the same time; `None` means one per CPU
    pub jobs: Option<usize>,
    /// Files renamed at the same time within one folder
    pub file_jobs: usize,
    /// Unflushed renames that trigger an intermediate log flush
    pub flush_threshold: usize,
    /// Glob pattern selecting the files of a folder
    pub file_pattern: String,
    /// Run log settings
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            jobs: None,
            file_jobs: DEFAULT_FILE_JOBS,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            log: LogSettings::default(),
        }
    }
}

/// Where and how the run log is written
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogSettings {
    /// Whether a run log is written at all
    pub enabled: bool,
    /// Directory holding the run logs; the platform data directory if unset
    pub directory: Option<PathBuf>,
    /// How much of the run ends up in the log
    pub mode: LogMode,
    /// Housekeeping applied to older logs
    pub retention: RetentionPolicy,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            enabled: true,
            directory: None,
            mode: LogMode::Full,
            retention: RetentionPolicy::default(),
        }
    }
}

/// Content of the run log
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Errors plus the complete rename mapping
    #[default]
    Full,
    /// Errors and counts only
    Summary,
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(LogMode::Full),
            "summary" => Ok(LogMode::Summary),
            _ => Err(format!("Unknown log mode: {s}")),
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMode::Full => write!(f, "full"),
            LogMode::Summary => write!(f, "summary"),
        }
    }
}

/// Limits applied to old run logs at start-up
///
/// A limit of zero disables that check.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RetentionPolicy {
    /// Most log files kept
    pub keep: usize,
    /// Logs older than this many days are removed
    pub max_age_days: u64,
    /// Total size of all logs in megabytes
    pub max_total_mb: u64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy {
            keep: DEFAULT_LOG_KEEP,
            max_age_days: DEFAULT_LOG_MAX_AGE_DAYS,
            max_total_mb: DEFAULT_LOG_MAX_MB,
        }
    }
}

impl RetentionPolicy {
    /// Size cap in bytes, if any
    pub fn max_total_bytes(&self) -> Option<u64> {
        (self.max_total_mb > 0).then(|| self.max_total_mb.saturating_mul(1024 * 1024))
    }
}
