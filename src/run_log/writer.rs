//! In-memory run log with periodic flushing
//!
//! Renames and errors are accumulated behind a mutex by many rename workers
//! at once. A flush snapshots the state and overwrites the run's single log
//! file; the file name is chosen on the first flush that has something to
//! write and stays the same for the rest of the run.

use std::collections::BTreeMap;
use std::fs::create_dir_all;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local};
use log::debug;
use tempfile::NamedTempFile;

use crate::config::{LogMode, LogSettings, RetentionPolicy};
use crate::errors::{file_operation_error, Result};
use crate::utils::lock;

use super::document::{ErrorRecord, RenameRecord, RunLogDocument};
use super::retention::{cleanup_old_logs, CleanupReport};

#[derive(Debug, Default)]
struct LogState {
    renamed: BTreeMap<String, String>,
    errors: Vec<ErrorRecord>,
    /// Successful renames since the last flush
    pending: usize,
    /// Anything changed since the last flush
    dirty: bool,
    finished_at: Option<DateTime<Local>>,
}

/// Accumulates the outcome of a run and persists it as JSON
#[derive(Debug)]
pub struct RunLog {
    enabled: bool,
    mode: LogMode,
    directory: PathBuf,
    retention: RetentionPolicy,
    started_at: DateTime<Local>,
    state: Mutex<LogState>,
    /// Held for the whole duration of a flush, so flushes never interleave
    file: Mutex<Option<PathBuf>>,
    /// An intermediate flush has been claimed and has not started yet
    flush_claimed: AtomicBool,
}

impl RunLog {
    /// Creates an empty run log writing into `directory`
    pub fn new(settings: &LogSettings, directory: PathBuf) -> Self {
        RunLog {
            enabled: settings.enabled,
            mode: settings.mode,
            directory,
            retention: settings.retention,
            started_at: Local::now(),
            state: Mutex::new(LogState::default()),
            file: Mutex::new(None),
            flush_claimed: AtomicBool::new(false),
        }
    }

    /// Whether anything is ever written to disk
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records a successful rename; the last write for a path wins
    pub fn record(&self, original: &Path, new: &Path) {
        let mut state = lock(&self.state);
        state.renamed.insert(
            original.to_string_lossy().to_string(),
            new.to_string_lossy().to_string(),
        );
        state.pending += 1;
        state.dirty = true;
    }

    /// Appends an error entry
    pub fn record_error(&self, entry: ErrorRecord) {
        let mut state = lock(&self.state);
        state.errors.push(entry);
        state.dirty = true;
    }

    /// Successful renames not yet written to disk
    pub fn pending(&self) -> usize {
        lock(&self.state).pending
    }

    /// Claims the next intermediate flush once more than `threshold`
    /// renames are unflushed
    ///
    /// Only one caller gets `true` until that flush starts, so a burst of
    /// renames past the threshold schedules a single flush.
    pub fn claim_flush(&self, threshold: usize) -> bool {
        if !self.enabled || self.pending() <= threshold {
            return false;
        }
        self.flush_claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Number of entries in the rename mapping
    pub fn renamed_count(&self) -> usize {
        lock(&self.state).renamed.len()
    }

    /// All rename records, ordered by original path
    pub fn renames(&self) -> Vec<RenameRecord> {
        lock(&self.state)
            .renamed
            .iter()
            .map(|(original, new)| RenameRecord {
                original_path: original.clone(),
                new_path: new.clone(),
            })
            .collect()
    }

    /// All error records, in the order they were reported
    pub fn errors(&self) -> Vec<ErrorRecord> {
        lock(&self.state).errors.clone()
    }

    /// Path of the log file, once the first flush has chosen it
    pub fn path(&self) -> Option<PathBuf> {
        lock(&self.file).clone()
    }

    /// Deletes old run logs according to the retention policy
    pub fn cleanup_old_logs(&self) -> CleanupReport {
        cleanup_old_logs(&self.directory, &self.retention)
    }

    /// Writes the current state to the log file
    ///
    /// Does nothing when nothing changed since the last flush, or when
    /// logging is disabled.
    ///
    /// # Returns
    /// * `Result<Option<PathBuf>>` - The log file, if one has been written
    ///
    /// # Errors
    /// Returns an error if the directory or the file cannot be written. The
    /// state stays marked as changed so the next flush tries again.
    pub fn flush(&self, working_path: &Path) -> Result<Option<PathBuf>> {
        let mut file = lock(&self.file);
        self.flush_claimed.store(false, Ordering::Release);

        let document = {
            let mut state = lock(&self.state);
            if !state.dirty {
                return Ok(file.clone());
            }
            state.dirty = false;
            state.pending = 0;
            if !self.enabled {
                return Ok(None);
            }
            self.snapshot(&state, working_path)
        };

        let path = file
            .get_or_insert_with(|| self.directory.join(log_file_name(Local::now())))
            .clone();

        if let Err(e) = write_document(&self.directory, &path, &document) {
            lock(&self.state).dirty = true;
            return Err(e);
        }

        debug!(
            "Flushed run log with {} renames and {} errors to {}",
            document.total_renamed,
            document.errors_count,
            path.display()
        );
        Ok(Some(path))
    }

    /// Stamps the finish time and performs the final flush
    ///
    /// A run that renamed nothing and hit no errors leaves no file behind.
    pub fn finish(&self, working_path: &Path) -> Result<Option<PathBuf>> {
        {
            let mut state = lock(&self.state);
            state.finished_at = Some(Local::now());
            if !state.renamed.is_empty() || !state.errors.is_empty() {
                state.dirty = true;
            }
        }
        self.flush(working_path)
    }

    fn snapshot(&self, state: &LogState, working_path: &Path) -> RunLogDocument {
        RunLogDocument {
            started_at: self.started_at,
            finished_at: state.finished_at,
            working_path: working_path.to_string_lossy().to_string(),
            total_renamed: state.renamed.len(),
            errors_count: state.errors.len(),
            errors: state.errors.clone(),
            renamed: match self.mode {
                LogMode::Full => Some(state.renamed.clone()),
                LogMode::Summary => None,
            },
        }
    }
}

/// File name for a run log started at `now`
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!(
        "{}~{:x}.json",
        now.format("%Y-%m-%d_%H-%M-%S"),
        rand::random::<u32>()
    )
}

fn write_document(directory: &Path, path: &Path, document: &RunLogDocument) -> Result<()> {
    create_dir_all(directory)
        .map_err(|e| file_operation_error(e, directory.to_path_buf(), "create directory"))?;

    let mut temporary = NamedTempFile::new_in(directory)
        .map_err(|e| file_operation_error(e, directory.to_path_buf(), "create temporary file in"))?;

    serde_json::to_writer_pretty(&mut temporary, document)
        .map_err(|e| file_operation_error(io::Error::other(e), path.to_path_buf(), "serialise"))?;
    temporary
        .flush()
        .map_err(|e| file_operation_error(e, path.to_path_buf(), "write"))?;

    temporary
        .persist(path)
        .map_err(|e| file_operation_error(e.error, path.to_path_buf(), "write"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_log::is_run_log_name;
    use std::fs;
    use tempfile::tempdir;

    fn settings(enabled: bool, mode: LogMode) -> LogSettings {
        LogSettings {
            enabled,
            mode,
            ..LogSettings::default()
        }
    }

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_flush_without_changes_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Full), temp_dir.path().join("logs"));

        assert_eq!(log.flush(Path::new("/data")).unwrap(), None);
        assert_eq!(log.finish(Path::new("/data")).unwrap(), None);
        assert!(!temp_dir.path().join("logs").exists());
    }

    #[test]
    fn test_flush_writes_document() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Full), temp_dir.path().to_path_buf());
        log.record(Path::new("/data/a.txt"), Path::new("/data/[x~]a.txt"));
        log.record_error(ErrorRecord::new("/data/b.txt", "PermissionDenied", "denied"));

        let path = log.flush(Path::new("/data")).unwrap().unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(is_run_log_name(name), "unexpected log file name {name}");

        let json = read(&path);
        assert_eq!(json["workingPath"], "/data");
        assert_eq!(json["totalRenamed"], 1);
        assert_eq!(json["errorsCount"], 1);
        assert_eq!(json["errors"][0]["code"], "PermissionDenied");
        assert_eq!(json["renamed"]["/data/a.txt"], "/data/[x~]a.txt");
        assert!(json["finishedAt"].is_null());
        assert_eq!(log.pending(), 0);
    }

    #[test]
    fn test_flushes_overwrite_the_same_file() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Full), temp_dir.path().to_path_buf());

        log.record(Path::new("/data/a.txt"), Path::new("/data/[x~]a.txt"));
        let first = log.flush(Path::new("/data")).unwrap().unwrap();

        log.record(Path::new("/data/b.txt"), Path::new("/data/[x~]b.txt"));
        let second = log.finish(Path::new("/data")).unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);

        let json = read(&second);
        assert_eq!(json["totalRenamed"], 2);
        assert!(json["finishedAt"].is_string());
    }

    #[test]
    fn test_summary_mode_omits_mapping() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Summary), temp_dir.path().to_path_buf());
        log.record(Path::new("/data/a.txt"), Path::new("/data/[x~]a.txt"));

        let path = log.finish(Path::new("/data")).unwrap().unwrap();

        let json = read(&path);
        assert_eq!(json["totalRenamed"], 1);
        assert!(json.get("renamed").is_none());
    }

    #[test]
    fn test_disabled_log_never_writes() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(false, LogMode::Full), temp_dir.path().join("logs"));
        log.record(Path::new("/data/a.txt"), Path::new("/data/[x~]a.txt"));

        assert_eq!(log.finish(Path::new("/data")).unwrap(), None);
        assert!(!temp_dir.path().join("logs").exists());
        assert_eq!(log.renamed_count(), 1);
    }

    #[test]
    fn test_record_is_idempotent_per_original_path() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Full), temp_dir.path().to_path_buf());

        log.record(Path::new("/data/a.txt"), Path::new("/data/[x~]a.txt"));
        log.record(Path::new("/data/a.txt"), Path::new("/data/[y~]a.txt"));

        let renames = log.renames();
        assert_eq!(renames.len(), 1);
        assert_eq!(renames[0].new_path, "/data/[y~]a.txt");
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Full), temp_dir.path().to_path_buf());

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let log = &log;
                scope.spawn(move || {
                    for index in 0..250 {
                        let original = PathBuf::from(format!("/data/{worker}/{index}.txt"));
                        log.record(&original, &original.with_extension("new"));
                        if index % 50 == 0 {
                            log.record_error(ErrorRecord::new("x", "ERR", "failed"));
                        }
                    }
                });
            }
        });

        assert_eq!(log.renamed_count(), 2000);
        assert_eq!(log.errors().len(), 40);
        assert_eq!(log.pending(), 2000);
    }

    #[test]
    fn test_claim_flush_is_granted_once() {
        let temp_dir = tempdir().unwrap();
        let log = RunLog::new(&settings(true, LogMode::Full), temp_dir.path().to_path_buf());

        log.record(Path::new("/data/a.txt"), Path::new("/data/[x~]a.txt"));
        assert!(!log.claim_flush(1));

        log.record(Path::new("/data/b.txt"), Path::new("/data/[x~]b.txt"));
        assert!(log.claim_flush(1));
        assert!(!log.claim_flush(1));

        log.flush(Path::new("/data")).unwrap();
        assert!(!log.claim_flush(1));

        log.record(Path::new("/data/c.txt"), Path::new("/data/[x~]c.txt"));
        log.record(Path::new("/data/d.txt"), Path::new("/data/[x~]d.txt"));
        assert!(log.claim_flush(1));
    }

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name(Local::now());
        assert!(is_run_log_name(&name), "unexpected log file name {name}");
    }
}
