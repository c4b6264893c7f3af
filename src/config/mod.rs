//! Configuration module
//!
//! This module contains components for loading and layering settings.

mod loader;
mod model;

pub use loader::{
    apply_env_overrides, expand_path, load_settings, load_settings_file, resolve_log_directory,
};
pub use model::{LogMode, LogSettings, RetentionPolicy, Settings};
