//! End-of-run console report
//!
//! Errors are held back while the live display runs and printed here,
//! grouped by code, followed by the per-folder counts and the log location.

use std::collections::HashMap;
use std::io::{self, Write};

use colored::Colorize;

use crate::constants::{MAX_REPORTED_ERRORS, MAX_REPORTED_PATH_WIDTH};
use crate::run_log::ErrorRecord;
use crate::utils::{ellipsize_start, first_line};
use crate::workflow::{LogOutcome, RunSummary};

/// Writes the full report for a finished run
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn write_report(out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
    write_errors(out, &summary.errors, MAX_REPORTED_ERRORS)?;
    write_counts(out, summary)?;
    write_log_location(out, &summary.log)
}

/// Error codes with their number of occurrences, most frequent first
pub fn count_by_code(errors: &[ErrorRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for error in errors {
        let code = if error.code.is_empty() { "UNKNOWN" } else { error.code.as_str() };
        *counts.entry(code).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(code, count)| (code.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Writes the grouped error list; nothing at all when there are no errors
pub fn write_errors(out: &mut impl Write, errors: &[ErrorRecord], max_listed: usize) -> io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}", format!("Errors ({})", errors.len()).bright_red())?;

    let codes = count_by_code(errors)
        .iter()
        .map(|(code, count)| format!("{code}:{count}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", codes.dimmed())?;

    for (index, error) in errors.iter().take(max_listed).enumerate() {
        writeln!(
            out,
            "{} {} {}",
            format!("{:02}.", index + 1).red(),
            format!("[{}]", error.code).yellow(),
            ellipsize_start(&error.file, MAX_REPORTED_PATH_WIDTH)
        )?;
        writeln!(out, "    {} {}", "->".dimmed(), first_line(&error.message))?;
    }

    if errors.len() > max_listed {
        writeln!(
            out,
            "{}",
            format!("...and {} more", errors.len() - max_listed).dimmed()
        )?;
    }

    Ok(())
}

fn write_counts(out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
    for (label, count) in &summary.counts {
        writeln!(out, "Processed From '{label}': {count}")?;
    }
    writeln!(out, "Total: {}", summary.total())
}

fn write_log_location(out: &mut impl Write, log: &LogOutcome) -> io::Result<()> {
    match log {
        LogOutcome::Written(path) => writeln!(out, "Log File: {}", path.display()),
        LogOutcome::Disabled => writeln!(out, "Log File: skipped (logging disabled)"),
        LogOutcome::Empty => writeln!(out, "Log File: skipped (nothing to log)"),
        LogOutcome::Failed(reason) => {
            writeln!(out, "Log File: skipped (write failed: {})", first_line(reason))
        }
    }
}
