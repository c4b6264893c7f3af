use anyhow::Result;
use chrono::SecondsFormat;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use indicatif::MultiProgress;
use log::LevelFilter;
use once_cell::sync::Lazy;
use std::fmt::Arguments;
use std::path::Path;
use std::sync::Mutex;

use crate::utils::lock;

/// Live display console lines are printed around while it is drawn
static DISPLAY: Lazy<Mutex<Option<MultiProgress>>> = Lazy::new(|| Mutex::new(None));

/// Verbosity level for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warning,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug, info, warning, and error messages
    Debug,
    /// Trace, debug, info, warning, and error messages
    Trace,
}

impl LogLevel {
    /// Convert verbosity level to log::LevelFilter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }

    /// Get the verbosity level from the number of occurrences of a flag
    pub fn from_occurrences(occurrences: u8) -> Self {
        match occurrences {
            0 => LogLevel::Info,  // Default
            1 => LogLevel::Debug, // -v
            _ => LogLevel::Trace, // -vv or more
        }
    }
}

/// Initialise the logger with the specified verbosity level
///
/// Console output goes to stderr. While a progress display is attached,
/// lines are printed with the display suspended so they never tear it.
pub fn init_logger(verbosity: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let base_logger = Dispatch::new().level(verbosity.to_level_filter());

    let colors_line = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::White)
        .trace(Color::BrightBlack);

    let output_logger = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "\x1B[{}m{}\x1B[0m",
                colors_line.get_color(&record.level()).to_fg_str(),
                message
            ))
        })
        .level(verbosity.to_level_filter())
        .chain(fern::Output::call(|record| write_console(record.args())));

    match log_file {
        Some(path) => {
            let file_logger = Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(verbosity.to_level_filter())
                .chain(fern::log_file(path)?);
            base_logger
                .chain(file_logger)
                .chain(output_logger)
                .apply()?;
        }
        None => base_logger.chain(output_logger).apply()?,
    }

    log::debug!("Logger initialized with verbosity level: {verbosity:?}");

    Ok(())
}

/// Routes console log lines around `display` until it is detached
pub fn attach_display(display: MultiProgress) {
    *lock(&DISPLAY) = Some(display);
}

/// Stops routing console log lines around the progress display
///
/// # Returns
/// * `Option<MultiProgress>` - The display that was attached, if any
pub fn detach_display() -> Option<MultiProgress> {
    lock(&DISPLAY).take()
}

fn write_console(message: &Arguments) {
    let line = message.to_string();
    match lock(&DISPLAY).as_ref() {
        Some(display) => display.suspend(|| eprintln!("{line}")),
        None => eprintln!("{line}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_to_level_filter() {
        assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warning.to_level_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Info.to_level_filter(), LevelFilter::Info);
        assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_log_level_from_occurrences() {
        assert_eq!(LogLevel::from_occurrences(0), LogLevel::Info);
        assert_eq!(LogLevel::from_occurrences(1), LogLevel::Debug);
        assert_eq!(LogLevel::from_occurrences(2), LogLevel::Trace);
        assert_eq!(LogLevel::from_occurrences(255), LogLevel::Trace);
    }

    #[test]
    fn test_console_lines_follow_attached_display() {
        use indicatif::{ProgressBar, ProgressDrawTarget};

        let display = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = display.add(ProgressBar::new(3));
        bar.inc(1);

        attach_display(display);
        write_console(&format_args!("routed around the display"));

        assert!(detach_display().is_some());
        assert!(detach_display().is_none());
        assert_eq!(bar.position(), 1);

        write_console(&format_args!("printed directly"));
    }
}
