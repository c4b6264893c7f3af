//! Outer concurrency sizing

use std::num::NonZeroUsize;
use std::thread::available_parallelism;

use atty::Stream;

use crate::constants::TERMINAL_ROW_RESERVE;

/// Number of folder tasks allowed to run at the same time
///
/// A positive `forced` value wins over `cpus`. When the live display has a
/// known height, the result is clamped so every slot line fits on screen.
/// Never below 1.
pub fn resolve_concurrency(forced: Option<usize>, cpus: usize, rows: Option<usize>) -> usize {
    let base = match forced {
        Some(jobs) if jobs > 0 => jobs,
        _ => cpus,
    };

    let clamped = match rows {
        Some(rows) => base.min(rows.saturating_sub(TERMINAL_ROW_RESERVE).max(1)),
        None => base,
    };

    clamped.max(1)
}

/// Execution units available to this process
pub fn available_cpus() -> usize {
    available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// Height of the terminal the live display is drawn on, if it is one
pub fn terminal_rows() -> Option<usize> {
    if !atty::is(Stream::Stderr) {
        return None;
    }
    console::Term::stderr()
        .size_checked()
        .map(|(rows, _columns)| usize::from(rows))
}
