/// Constants used throughout the application
///
/// This module centralises all constants used in the application to make
/// them easier to manage and update.

/// Qualifier string used for application identification
///
/// This is used as part of the application's unique identifier.
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
///
/// This is used as part of the application's unique identifier.
pub const ORGANIZATION: &str = "Ondřej Vágner";

/// Application name used for identification
///
/// This is the name of the application used in various contexts like
/// configuration file paths and application identification.
pub const APPLICATION: &str = "uniquifier";

/// Help text for the target path argument
pub const PATH_HELP: &str = "File or directory whose files should be prefixed";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read settings from a specific config file";

/// Help text for the jobs command-line option
pub const JOBS_HELP: &str = "Number of folders processed at the same time";

/// Help text for the file jobs command-line option
pub const FILE_JOBS_HELP: &str = "Number of files renamed at the same time within one folder";

/// Help text for the log mode command-line option
pub const LOG_MODE_HELP: &str = "Run log content: 'full' keeps the rename mapping, 'summary' omits it";

/// Help text for the no-log command-line option
pub const NO_LOG_HELP: &str = "Do not write a run log";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Write diagnostic output to this file";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Default name of the configuration file inside the config directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default diagnostic log file (empty means console only)
pub const LOG_FILE_DEFAULT: &str = "";

/// Name of the run log directory inside the data directory
pub const LOG_DIRECTORY_NAME: &str = "logs";

/// Environment variables recognised as overrides
pub const ENV_JOBS: &str = "UNIQUIFIER_JOBS";
pub const ENV_JOBS_FALLBACK: &str = "JOBS";
pub const ENV_FILE_JOBS: &str = "UNIQUIFIER_FILE_JOBS";
pub const ENV_LOG: &str = "UNIQUIFIER_LOG";
pub const ENV_LOG_DIR: &str = "UNIQUIFIER_LOG_DIR";
pub const ENV_LOG_MODE: &str = "UNIQUIFIER_LOG_MODE";
pub const ENV_LOG_KEEP: &str = "UNIQUIFIER_LOG_KEEP";
pub const ENV_LOG_MAX_AGE_DAYS: &str = "UNIQUIFIER_LOG_MAX_AGE_DAYS";
pub const ENV_LOG_MAX_MB: &str = "UNIQUIFIER_LOG_MAX_MB";

/// Files renamed concurrently inside a single folder
pub const DEFAULT_FILE_JOBS: usize = 50;

/// Unflushed renames that trigger an intermediate run log flush
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100;

/// Glob pattern used to list the files of a folder
pub const DEFAULT_FILE_PATTERN: &str = "*";

/// Run log retention defaults
pub const DEFAULT_LOG_KEEP: usize = 50;
pub const DEFAULT_LOG_MAX_AGE_DAYS: u64 = 30;
pub const DEFAULT_LOG_MAX_MB: u64 = 100;

/// Rows kept free below the live display
pub const TERMINAL_ROW_RESERVE: usize = 4;

/// Display widths for the progress lines
pub const MAX_NAME_WIDTH: usize = 38;
pub const MAX_FILE_WIDTH: usize = 46;

/// Error report limits
pub const MAX_REPORTED_ERRORS: usize = 60;
pub const MAX_REPORTED_PATH_WIDTH: usize = 120;

/// Validation messages for the run target
pub const MISSING_LOCATION_MESSAGE: &str = "You have to provide a location";
pub const INVALID_LOCATION_MESSAGE: &str = "You have to provide a valid location";
pub const UNSUPPORTED_LOCATION_MESSAGE: &str = "Provide either a file path or a directory path";
