//! Housekeeping for old run logs
//!
//! Applied once at start-up, before anything is renamed: first by age, then
//! by count, then by total size. Every deletion is best-effort.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use glob::Pattern;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RetentionPolicy;

static LOG_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}~[0-9a-f]+\.json$")
        .expect("Failed to compile regex pattern for LOG_NAME_PATTERN")
});

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// What a cleanup pass did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Log files that were deleted
    pub removed: Vec<PathBuf>,
    /// Log files that should have been deleted but could not be
    pub failed: Vec<PathBuf>,
}

#[derive(Debug)]
struct LogFile {
    path: PathBuf,
    modified: SystemTime,
    size: u64,
}

/// Checks whether a file name follows the run log naming scheme
pub fn is_run_log_name(name: &str) -> bool {
    LOG_NAME_PATTERN.is_match(name)
}

/// Applies `policy` to the run logs in `directory`
pub fn cleanup_old_logs(directory: &Path, policy: &RetentionPolicy) -> CleanupReport {
    cleanup_old_logs_at(directory, policy, SystemTime::now())
}

/// Applies `policy` as if the current time were `now`
pub fn cleanup_old_logs_at(
    directory: &Path,
    policy: &RetentionPolicy,
    now: SystemTime,
) -> CleanupReport {
    let mut report = CleanupReport::default();
    let mut logs = list_logs(directory);

    // Newest first, so the oldest entries sit at the end
    logs.sort_by(|a, b| b.modified.cmp(&a.modified));

    if policy.max_age_days > 0 {
        let max_age = Duration::from_secs(policy.max_age_days.saturating_mul(SECONDS_PER_DAY));
        let cutoff = now.checked_sub(max_age).unwrap_or(SystemTime::UNIX_EPOCH);
        let (expired, fresh): (Vec<LogFile>, Vec<LogFile>) =
            logs.into_iter().partition(|log| log.modified < cutoff);
        for log in &expired {
            remove(log, &mut report);
        }
        logs = fresh;
    }

    if policy.keep > 0 && logs.len() > policy.keep {
        for log in logs.split_off(policy.keep) {
            remove(&log, &mut report);
        }
    }

    if let Some(max_bytes) = policy.max_total_bytes() {
        let mut total: u64 = logs.iter().map(|log| log.size).sum();
        while total > max_bytes {
            let Some(oldest) = logs.pop() else {
                break;
            };
            if remove(&oldest, &mut report) {
                total = total.saturating_sub(oldest.size);
            }
        }
    }

    report
}

fn list_logs(directory: &Path) -> Vec<LogFile> {
    let Some(base) = directory.to_str() else {
        warn!("Log directory is not valid unicode: {}", directory.display());
        return Vec::new();
    };
    let pattern = format!("{}/*.json", Pattern::escape(base.trim_end_matches('/')));

    let Ok(entries) = glob::glob(&pattern) else {
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_run_log_name)
        })
        .filter_map(|path| {
            let metadata = fs::metadata(&path).ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some(LogFile {
                modified: metadata.modified().ok()?,
                size: metadata.len(),
                path,
            })
        })
        .collect()
}

fn remove(log: &LogFile, report: &mut CleanupReport) -> bool {
    match fs::remove_file(&log.path) {
        Ok(()) => {
            debug!("Removed old run log {}", log.path.display());
            report.removed.push(log.path.clone());
            true
        }
        Err(e) => {
            warn!("Failed to remove old run log {}: {}", log.path.display(), e);
            report.failed.push(log.path.clone());
            false
        }
    }
}
