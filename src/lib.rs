pub mod cli;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod errors;
pub mod logging;
pub mod prefix;
pub mod processor;
pub mod progress;
pub mod report;
pub mod run_log;
pub mod utils;
pub mod workflow;

pub mod prelude {
    pub use crate::config::{LogMode, LogSettings, RetentionPolicy, Settings, load_settings};
    pub use crate::errors::{
        file_operation_error, generic_error, glob_pattern_error, invalid_filename_error,
        path_not_found_error, path_operation_error,
    };
    pub use crate::errors::{Error, Result};
    pub use crate::logging::{LogLevel, init_logger};
    pub use crate::prefix::{FolderPrefix, generate_prefix};
    pub use crate::processor::{RenameOutcome, rename_one};
    pub use crate::progress::{NoProgress, Progress, SlotHandle, TerminalProgress};
    pub use crate::report::write_report;
    pub use crate::run_log::{ErrorRecord, RenameRecord, RunLog, RunLogDocument};
    pub use crate::workflow::{LogOutcome, RunSummary, Scheduler, Target, validate_target};
}
