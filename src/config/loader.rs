//! Configuration loading functionality
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment overrides. Command-line flags are applied last by the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde_yaml::from_str;

use crate::constants::{
    DEFAULT_CONFIG_FILE, ENV_FILE_JOBS, ENV_JOBS, ENV_JOBS_FALLBACK, ENV_LOG, ENV_LOG_DIR,
    ENV_LOG_KEEP, ENV_LOG_MAX_AGE_DAYS, ENV_LOG_MAX_MB, ENV_LOG_MODE, LOG_DIRECTORY_NAME,
};
use crate::utils::find_project_folder;

use super::model::{LogMode, Settings};

/// Loads settings from a configuration file and the environment
///
/// Without an explicit file, `config.yaml` in the platform configuration
/// directory is used when it exists.
///
/// # Arguments
/// * `config_file` - Explicit configuration file, if any
///
/// # Returns
/// * `Result<Settings>` - The merged settings or an error
///
/// # Errors
/// Returns an error if an explicit file is missing or any file fails to parse
pub fn load_settings(config_file: Option<&Path>) -> Result<Settings> {
    let mut settings = match config_file {
        Some(file) => load_settings_file(file)?,
        None => match default_config_file() {
            Some(file) if file.exists() => load_settings_file(&file)?,
            _ => Settings::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Loads settings from a YAML file
///
/// # Errors
/// Returns an error if the file cannot be read or its YAML is invalid
pub fn load_settings_file(file: &Path) -> Result<Settings> {
    let content = fs::read_to_string(file).map_err(|e| {
        anyhow!(
            "Failed to read configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    let mut settings: Settings = from_str(&content).map_err(|e| {
        anyhow!(
            "Failed to parse configuration file {}: {}\nPlease check the YAML syntax.",
            file.display(),
            e
        )
    })?;

    if let Some(directory) = &settings.log.directory {
        settings.log.directory = Some(PathBuf::from(expand_path(&directory.to_string_lossy())));
    }

    debug!("Loaded configuration from {}", file.display());
    Ok(settings)
}

/// Applies environment overrides on top of `settings`
///
/// `lookup` returns the value of an environment variable. Values that do not
/// parse are ignored with a warning; non-positive job counts mean "auto".
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let jobs = lookup(ENV_JOBS).or_else(|| lookup(ENV_JOBS_FALLBACK));
    if let Some(value) = jobs {
        match value.trim().parse::<i64>() {
            Ok(n) if n > 0 => settings.jobs = Some(n as usize),
            Ok(_) => settings.jobs = None,
            Err(_) => warn!("Ignoring invalid job count '{value}'"),
        }
    }

    if let Some(n) = parse_env::<usize>(&lookup, ENV_FILE_JOBS)
        && n > 0
    {
        settings.file_jobs = n;
    }

    if let Some(value) = lookup(ENV_LOG) {
        match parse_switch(&value) {
            Some(enabled) => settings.log.enabled = enabled,
            None => warn!("Ignoring invalid value '{value}' for {ENV_LOG}"),
        }
    }

    if let Some(value) = lookup(ENV_LOG_DIR)
        && !value.trim().is_empty()
    {
        settings.log.directory = Some(PathBuf::from(expand_path(value.trim())));
    }

    if let Some(mode) = parse_env::<LogMode>(&lookup, ENV_LOG_MODE) {
        settings.log.mode = mode;
    }

    if let Some(keep) = parse_env::<usize>(&lookup, ENV_LOG_KEEP) {
        settings.log.retention.keep = keep;
    }

    if let Some(days) = parse_env::<u64>(&lookup, ENV_LOG_MAX_AGE_DAYS) {
        settings.log.retention.max_age_days = days;
    }

    if let Some(mb) = parse_env::<u64>(&lookup, ENV_LOG_MAX_MB) {
        settings.log.retention.max_total_mb = mb;
    }
}

/// Resolves the directory run logs are written to
///
/// # Errors
/// Returns an error if no directory is configured and the platform
/// directories cannot be determined
pub fn resolve_log_directory(settings: &Settings) -> Result<PathBuf> {
    match &settings.log.directory {
        Some(directory) => Ok(directory.clone()),
        None => {
            let folder = find_project_folder()?;
            Ok(folder.data_local_dir().join(LOG_DIRECTORY_NAME))
        }
    }
}

/// Expands `~` and environment variables in a path
///
/// Falls back to expanding only the tilde if a variable is not set.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|expanded| expanded.to_string())
        .unwrap_or_else(|_| shellexpand::tilde(path).to_string())
}

fn default_config_file() -> Option<PathBuf> {
    find_project_folder()
        .ok()
        .map(|folder| folder.config_dir().join(DEFAULT_CONFIG_FILE))
}

fn parse_env<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = lookup(key)?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid value '{value}' for {key}");
            None
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
