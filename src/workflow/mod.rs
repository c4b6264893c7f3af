//! Workflow module
//!
//! This module contains components for orchestrating a run: sizing the
//! outer concurrency, scheduling folder tasks, and collecting their results.

mod concurrency;
mod context;
mod engine;
mod folder;

pub use concurrency::{available_cpus, resolve_concurrency, terminal_rows};
pub use context::{FolderResult, LogOutcome, RunSummary};
pub use engine::{Scheduler, Target, validate_target};
pub use folder::{Diagnostics, FolderContext, process_folder};
