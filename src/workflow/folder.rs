//! Folder task
//!
//! Renames every file directly inside one folder with the folder's prefix.
//! Sub-folders are separate tasks with their own prefix.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::Scope;

use log::{debug, trace};
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::discovery::list_files;
use crate::errors::Error;
use crate::prefix::FolderPrefix;
use crate::processor::{RenameOutcome, rename_one};
use crate::progress::Progress;
use crate::run_log::{ErrorRecord, RunLog};

use super::context::FolderResult;

/// Error sink handed to every folder task
///
/// Failures go into the run log and bump the error tally on the display.
/// Nothing is printed while the run is in progress.
#[derive(Clone, Copy)]
pub struct Diagnostics<'a> {
    log: &'a RunLog,
    progress: &'a dyn Progress,
}

impl<'a> Diagnostics<'a> {
    pub fn new(log: &'a RunLog, progress: &'a dyn Progress) -> Self {
        Diagnostics { log, progress }
    }

    /// Records a failure that happened while handling `path`
    pub fn error(&self, path: &Path, error: &Error) {
        debug!("{}: {error}", path.display());
        self.log.record_error(ErrorRecord::from_error(path, error));
        self.progress.report_error(1);
    }
}

/// Everything a folder task shares with the rest of the run
pub struct FolderContext<'a> {
    /// Path the run was started on, written into the run log
    pub working_path: &'a Path,
    pub log: &'a RunLog,
    pub progress: &'a dyn Progress,
    /// Pool the renames of a folder are fanned out on
    pub pool: &'a ThreadPool,
    /// Glob pattern selecting the files of a folder
    pub file_pattern: &'a str,
    /// Renames of one folder running at the same time, at most
    pub file_jobs: usize,
    /// Unflushed renames that trigger an intermediate flush
    pub flush_threshold: usize,
}

impl<'a> FolderContext<'a> {
    pub fn diagnostics(&self) -> Diagnostics<'a> {
        Diagnostics::new(self.log, self.progress)
    }
}

/// Processes the files directly inside `folder`
///
/// Every file advances the folder's slot exactly once, whether its rename
/// worked or not. Intermediate log flushes are spawned on `scope`, so the
/// run waits for them without this folder waiting.
///
/// # Arguments
/// * `ctx` - Shared run state
/// * `scope` - Scope the intermediate flushes are spawned on
/// * `folder` - The folder to process
/// * `label` - Name the folder is reported under
pub fn process_folder<'scope, 'env>(
    ctx: &'env FolderContext<'env>,
    scope: &'scope Scope<'scope, 'env>,
    folder: &Path,
    label: &str,
) -> FolderResult {
    let diagnostics = ctx.diagnostics();
    let mut result = FolderResult {
        label: label.to_string(),
        ..FolderResult::default()
    };

    let listing = match list_files(folder, ctx.file_pattern) {
        Ok(listing) => listing,
        Err(e) => {
            diagnostics.error(folder, &e);
            let handle = ctx.progress.acquire_slot(label, 0);
            ctx.progress.release(handle);
            return result;
        }
    };
    for error in &listing.errors {
        diagnostics.error(error.path().unwrap_or(folder), error);
    }

    let prefix = FolderPrefix::for_folder(folder);
    trace!("Prefix {} for {}", prefix.token, folder.display());

    let files = listing.paths;
    let handle = ctx
        .progress
        .acquire_slot(label, u64::try_from(files.len()).unwrap_or(u64::MAX));

    let renamed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    ctx.pool.install(|| {
        let min_len = batch_len(files.len(), ctx.file_jobs);
        files.par_iter().with_min_len(min_len).for_each(|file| {
            match rename_one(file, &prefix.token) {
                Ok(RenameOutcome::Renamed { from, to }) => {
                    ctx.log.record(&from, &to);
                    renamed.fetch_add(1, Ordering::Relaxed);
                }
                Ok(RenameOutcome::Unchanged) => {}
                Err(e) => {
                    diagnostics.error(file, &e);
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }

            let name = file
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            ctx.progress.advance(handle, 1, &name);

            if ctx.log.claim_flush(ctx.flush_threshold) {
                spawn_flush(scope, ctx.log, ctx.working_path);
            }
        });
    });

    result.processed = files.len();
    result.renamed = renamed.into_inner();
    result.failed = failed.into_inner();

    ctx.progress.release(handle);
    debug!(
        "Processed {} files in '{}' ({} renamed)",
        result.processed, label, result.renamed
    );

    result
}

/// Smallest batch that splits `files` into at most `file_jobs` parallel parts
fn batch_len(files: usize, file_jobs: usize) -> usize {
    files.div_ceil(file_jobs.max(1)).max(1)
}

fn spawn_flush<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    log: &'env RunLog,
    working_path: &'env Path,
) {
    scope.spawn(move || {
        if let Err(e) = log.flush(working_path) {
            debug!("Intermediate run log flush failed: {e}");
        }
    });
}
