use std::path::PathBuf;

use clap::{command, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config::{LogMode, Settings};
use crate::constants::{
    CONFIG_HELP, FILE_JOBS_HELP, JOBS_HELP, LOG_FILE_DEFAULT, LOG_FILE_HELP, LOG_MODE_HELP,
    NO_LOG_HELP, PATH_HELP, VERBOSE_HELP,
};
use crate::logging::LogLevel;

/// Builds the command-line interface
///
/// Defines the following arguments:
/// - `path`: File or directory to process
/// - `jobs`: Folders processed at the same time
/// - `file_jobs`: Files renamed at the same time within one folder
/// - `log_mode`: Content of the run log
/// - `no_log`: Skip the run log
/// - `config`: Path to a configuration file
/// - `log_file`: Diagnostic log file
/// - `verbose`: Increase verbosity level
///
/// The path is optional here so a missing location is reported with the
/// program's own message.
pub fn build_command() -> Command {
    // define the run target
    let arg_path = Arg::new("path").help(PATH_HELP).value_name("PATH");

    // define args for the concurrency caps
    let arg_jobs = Arg::new("jobs")
        .short('j')
        .long("jobs")
        .help(JOBS_HELP)
        .value_parser(value_parser!(usize));

    let arg_file_jobs = Arg::new("file_jobs")
        .long("file-jobs")
        .help(FILE_JOBS_HELP)
        .value_parser(value_parser!(usize));

    // define args for the run log
    let arg_log_mode = Arg::new("log_mode")
        .long("log-mode")
        .help(LOG_MODE_HELP)
        .value_parser(["full", "summary"]);

    let arg_no_log = Arg::new("no_log")
        .long("no-log")
        .help(NO_LOG_HELP)
        .action(ArgAction::SetTrue);

    // define arg for reading from a specific config file
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .value_parser(value_parser!(PathBuf));

    // define arg for log file
    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .default_value(LOG_FILE_DEFAULT);

    // define arg for verbosity level
    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(ArgAction::Count);

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .name(crate_name!())
        .version(crate_version!())
        .arg(arg_path)
        .arg(arg_jobs)
        .arg(arg_file_jobs)
        .arg(arg_log_mode)
        .arg(arg_no_log)
        .arg(arg_config)
        .arg(log_file)
        .arg(arg_verbose)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_command().get_matches()
}

/// Gets the target location, if one was given
pub fn get_location(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("path").map(String::as_str)
}

/// Gets the explicit configuration file, if one was given
pub fn get_config_file(matches: &ArgMatches) -> Option<&PathBuf> {
    matches.get_one::<PathBuf>("config")
}

/// Gets the verbosity level from the command-line arguments
///
/// This function counts the occurrences of the "verbose" flag and converts
/// it to a [`LogLevel`].
///
/// # Examples
/// ```
/// use uniquifier::cli::{build_command, get_verbosity};
/// use uniquifier::logging::LogLevel;
///
/// let matches = build_command().get_matches_from(["uniquifier", "-vv", "."]);
/// assert_eq!(get_verbosity(&matches), LogLevel::Trace);
/// ```
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    let verbose_count = matches.get_count("verbose");
    LogLevel::from_occurrences(verbose_count)
}

/// Gets the diagnostic log file, if one was given
pub fn get_log_file(matches: &ArgMatches) -> Option<PathBuf> {
    matches
        .get_one::<String>("log_file")
        .filter(|filename| !filename.is_empty())
        .map(PathBuf::from)
}

/// Applies command-line flags on top of already loaded settings
pub fn apply_cli_overrides(settings: &mut Settings, matches: &ArgMatches) {
    if let Some(&jobs) = matches.get_one::<usize>("jobs") {
        settings.jobs = (jobs > 0).then_some(jobs);
    }

    if let Some(&file_jobs) = matches.get_one::<usize>("file_jobs")
        && file_jobs > 0
    {
        settings.file_jobs = file_jobs;
    }

    if let Some(mode) = matches.get_one::<String>("log_mode")
        && let Ok(mode) = mode.parse::<LogMode>()
    {
        settings.log.mode = mode;
    }

    if matches.get_flag("no_log") {
        settings.log.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["uniquifier"];
        argv.extend_from_slice(args);
        build_command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_consistent() {
        build_command().debug_assert();
    }

    #[test]
    fn test_location_is_optional() {
        assert_eq!(get_location(&matches(&[])), None);
        assert_eq!(get_location(&matches(&["photos"])), Some("photos"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        apply_cli_overrides(
            &mut settings,
            &matches(&["-j", "3", "--file-jobs", "8", "--log-mode", "summary", "--no-log", "."]),
        );

        assert_eq!(settings.jobs, Some(3));
        assert_eq!(settings.file_jobs, 8);
        assert_eq!(settings.log.mode, LogMode::Summary);
        assert!(!settings.log.enabled);
    }

    #[test]
    fn test_zero_jobs_means_auto() {
        let mut settings = Settings {
            jobs: Some(4),
            ..Settings::default()
        };
        apply_cli_overrides(&mut settings, &matches(&["-j", "0", "."]));
        assert_eq!(settings.jobs, None);
    }

    #[test]
    fn test_without_flags_settings_are_kept() {
        let mut settings = Settings::default();
        apply_cli_overrides(&mut settings, &matches(&["."]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_log_mode_is_rejected() {
        assert!(build_command()
            .try_get_matches_from(["uniquifier", "--log-mode", "verbose", "."])
            .is_err());
    }

    #[test]
    fn test_log_file() {
        assert_eq!(get_log_file(&matches(&["."])), None);
        assert_eq!(
            get_log_file(&matches(&["-l", "run.log", "."])),
            Some(PathBuf::from("run.log"))
        );
    }
}
