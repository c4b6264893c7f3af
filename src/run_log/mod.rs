//! Run log module
//!
//! This module contains the audit trail of a run: the rename mapping, the
//! error entries, the JSON document they are written as, and the retention
//! rules for older logs.

mod document;
mod retention;
mod writer;

pub use document::{ErrorRecord, RenameRecord, RunLogDocument};
pub use retention::{CleanupReport, cleanup_old_logs, cleanup_old_logs_at, is_run_log_name};
pub use writer::{RunLog, log_file_name};
