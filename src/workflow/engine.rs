//! Workflow engine
//!
//! This module contains the scheduler that runs one folder task per folder
//! under the outer concurrency cap.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{Settings, resolve_log_directory};
use crate::constants::{
    INVALID_LOCATION_MESSAGE, MISSING_LOCATION_MESSAGE, UNSUPPORTED_LOCATION_MESSAGE,
};
use crate::discovery::{PathKind, absolute_path, list_folders, resolve_kind};
use crate::errors::{Error, Result, generic_error};
use crate::prefix::FolderPrefix;
use crate::processor::{RenameOutcome, rename_one};
use crate::progress::{NoProgress, Progress};
use crate::run_log::RunLog;
use crate::utils::{folder_label, lock};

use super::concurrency::{available_cpus, resolve_concurrency, terminal_rows};
use super::context::{FolderResult, LogOutcome, RunSummary};
use super::folder::{Diagnostics, FolderContext, process_folder};

/// A validated run target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Absolute path, symbolic links not resolved
    pub path: PathBuf,
    pub kind: PathKind,
}

/// Checks the user supplied location
///
/// # Errors
/// Returns an error with a message meant for the user if the location is
/// missing, does not exist, or is neither a file nor a directory
pub fn validate_target(location: Option<&str>) -> Result<Target> {
    let location = match location {
        Some(location) if !location.trim().is_empty() => location,
        _ => return Err(generic_error(MISSING_LOCATION_MESSAGE)),
    };

    let path = absolute_path(Path::new(location))?;
    let kind = resolve_kind(&path).map_err(|_| generic_error(INVALID_LOCATION_MESSAGE))?;
    if kind == PathKind::Other {
        return Err(generic_error(UNSUPPORTED_LOCATION_MESSAGE));
    }

    Ok(Target { path, kind })
}

/// Runs folder tasks over a directory tree
pub struct Scheduler {
    settings: Settings,
    log: RunLog,
}

impl Scheduler {
    /// Creates a scheduler with its run log
    ///
    /// # Errors
    /// Returns an error if no log directory can be determined
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let directory = resolve_log_directory(&settings)?;
        let log = RunLog::new(&settings.log, directory);
        Ok(Scheduler { settings, log })
    }

    /// Processes every file of `target`
    ///
    /// Old run logs are cleaned up first. A single file is renamed directly
    /// without a progress display; for a directory the root and all of its
    /// sub-folders are processed, at most the resolved concurrency at a time.
    /// `make_progress` receives the number of slots and folders and builds
    /// the display for the run.
    ///
    /// # Returns
    /// * `Result<RunSummary>` - Counts, errors and the fate of the run log
    ///
    /// # Errors
    /// Returns an error if the target is not valid or the rename pool cannot
    /// be started. Failures of single files and folders are recorded in the
    /// summary instead.
    pub fn run<P, F>(&self, target: &Target, make_progress: F) -> Result<RunSummary>
    where
        P: Progress,
        F: FnOnce(usize, u64) -> P,
    {
        self.cleanup_old_logs();

        match target.kind {
            PathKind::File => Ok(self.run_single_file(&target.path)),
            PathKind::Directory => self.run_directory(&target.path, make_progress),
            PathKind::Other => Err(generic_error(UNSUPPORTED_LOCATION_MESSAGE)),
        }
    }

    fn cleanup_old_logs(&self) {
        if !self.log.is_enabled() {
            return;
        }
        let report = self.log.cleanup_old_logs();
        if !report.removed.is_empty() || !report.failed.is_empty() {
            debug!(
                "Log cleanup removed {} old logs ({} could not be removed)",
                report.removed.len(),
                report.failed.len()
            );
        }
    }

    fn run_single_file(&self, file: &Path) -> RunSummary {
        let mut summary = RunSummary::new(file.to_path_buf(), 1);
        let folder = file.parent().unwrap_or(file);
        let prefix = FolderPrefix::for_folder(folder);

        let mut result = FolderResult {
            label: folder_label(folder, folder),
            processed: 1,
            ..FolderResult::default()
        };
        match rename_one(file, &prefix.token) {
            Ok(RenameOutcome::Renamed { from, to }) => {
                self.log.record(&from, &to);
                result.renamed = 1;
            }
            Ok(RenameOutcome::Unchanged) => {}
            Err(e) => {
                Diagnostics::new(&self.log, &NoProgress).error(file, &e);
                result.failed = 1;
            }
        }
        summary.add_folder(&result);

        self.finish(summary, file)
    }

    fn run_directory<P, F>(&self, root: &Path, make_progress: F) -> Result<RunSummary>
    where
        P: Progress,
        F: FnOnce(usize, u64) -> P,
    {
        let listing = list_folders(root, true);
        let mut folders = Vec::with_capacity(listing.paths.len() + 1);
        folders.push(root.to_path_buf());
        folders.extend(listing.paths);

        let cpus = available_cpus();
        let concurrency = resolve_concurrency(self.settings.jobs, cpus, terminal_rows());
        let progress = make_progress(concurrency, u64::try_from(folders.len()).unwrap_or(u64::MAX));

        for error in &listing.errors {
            self.report_enumeration_error(root, error, &progress);
        }

        progress.log(&format!(
            "Processing: {} | workers={} | cpus={}",
            root.display(),
            concurrency,
            cpus
        ));
        debug!("Processing {} folders with {} workers", folders.len(), concurrency);

        let pool = self.rename_pool(concurrency)?;
        let ctx = FolderContext {
            working_path: root,
            log: &self.log,
            progress: &progress,
            pool: &pool,
            file_pattern: &self.settings.file_pattern,
            file_jobs: self.settings.file_jobs.max(1),
            flush_threshold: self.settings.flush_threshold,
        };

        let results = Mutex::new(Vec::with_capacity(folders.len()));
        let next = AtomicUsize::new(0);
        let workers = concurrency.min(folders.len());

        thread::scope(|scope| {
            for _ in 0..workers {
                let (ctx, folders, results, next) = (&ctx, &folders, &results, &next);
                scope.spawn(move || {
                    while let Some(folder) = folders.get(next.fetch_add(1, Ordering::Relaxed)) {
                        let label = folder_label(root, folder);
                        let result = process_folder(ctx, scope, folder, &label);
                        lock(results).push(result);
                    }
                });
            }
        });

        let mut summary = RunSummary::new(root.to_path_buf(), concurrency);
        for result in results.into_inner().unwrap_or_else(|e| e.into_inner()) {
            summary.add_folder(&result);
        }

        let summary = self.finish(summary, root);
        progress.stop();
        Ok(summary)
    }

    fn report_enumeration_error(&self, root: &Path, error: &Error, progress: &dyn Progress) {
        Diagnostics::new(&self.log, progress).error(error.path().unwrap_or(root), error);
    }

    /// Pool shared by all folder tasks, big enough for each of the
    /// `concurrency` running folders to use its full `file_jobs`
    fn rename_pool(&self, concurrency: usize) -> Result<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.settings.file_jobs.max(1).saturating_mul(concurrency.max(1)))
            .thread_name(|index| format!("rename-{index}"))
            .build()
            .map_err(|e| generic_error(&format!("Failed to start the rename pool: {e}")))
    }

    fn finish(&self, mut summary: RunSummary, working_path: &Path) -> RunSummary {
        summary.log = match self.log.finish(working_path) {
            Ok(Some(path)) => LogOutcome::Written(path),
            Ok(None) if !self.log.is_enabled() => LogOutcome::Disabled,
            Ok(None) => LogOutcome::Empty,
            Err(e) => {
                debug!("Failed to write the run log: {e}");
                LogOutcome::Failed(e.to_string())
            }
        };
        summary.errors = self.log.errors();
        summary
    }
}
