//! Live multi-line progress display
//!
//! One line per concurrent folder plus an overall line, drawn on stderr
//! with `indicatif`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::constants::{MAX_FILE_WIDTH, MAX_NAME_WIDTH};
use crate::logging::{attach_display, detach_display};
use crate::utils::{ellipsize_middle, ellipsize_start, lock};

use super::{Progress, SlotHandle, SlotTable, idle_label};

const REFRESH_RATE: u8 = 12;
const SLOT_TEMPLATE: &str = "{prefix:<40} [{bar:30.cyan/blue}] {pos:>5}/{len:<5} {msg}";
const OVERALL_TEMPLATE: &str = "{prefix:<40} [{bar:30.green/white}] {pos:>5}/{len:<5} {elapsed}";

/// Progress display backed by `indicatif`
pub struct TerminalProgress {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
    overall: ProgressBar,
    table: Mutex<SlotTable>,
    errors: AtomicU64,
    routes_console: bool,
}

impl TerminalProgress {
    /// Creates a display drawing to stderr
    ///
    /// Console log lines are printed around the display until it is stopped.
    ///
    /// # Arguments
    /// * `slots` - Number of folder lines, normally the outer concurrency
    /// * `folders` - Number of folders in the run
    pub fn new(slots: usize, folders: u64) -> Self {
        let mut progress =
            Self::with_draw_target(ProgressDrawTarget::stderr_with_hz(REFRESH_RATE), slots, folders);
        attach_display(progress.multi.clone());
        progress.routes_console = true;
        progress
    }

    /// Creates a display that keeps its state but draws nothing
    pub fn hidden(slots: usize, folders: u64) -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden(), slots, folders)
    }

    fn with_draw_target(target: ProgressDrawTarget, slots: usize, folders: u64) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let table = SlotTable::new(slots);

        let slot_style = style(SLOT_TEMPLATE);
        let bars = (0..table.len())
            .map(|index| {
                let bar = multi.add(ProgressBar::new(0));
                bar.set_style(slot_style.clone());
                bar.set_prefix(idle_label(index).dimmed().to_string());
                bar
            })
            .collect();

        let overall = multi.add(ProgressBar::new(folders));
        overall.set_style(style(OVERALL_TEMPLATE));
        overall.set_prefix(overall_label(0));

        TerminalProgress {
            multi,
            bars,
            overall,
            table: Mutex::new(table),
            errors: AtomicU64::new(0),
            routes_console: false,
        }
    }

    /// Folders released so far
    pub fn completed(&self) -> u64 {
        self.overall.position()
    }

    /// Errors reported so far
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Snapshot of the slot states
    pub fn slots(&self) -> SlotTable {
        lock(&self.table).clone()
    }
}

impl Progress for TerminalProgress {
    fn acquire_slot(&self, label: &str, total: u64) -> SlotHandle {
        let handle = lock(&self.table).acquire(label, total);
        if let Some(bar) = self.bars.get(handle.0) {
            bar.reset();
            bar.set_length(total);
            bar.set_prefix(ellipsize_middle(label, MAX_NAME_WIDTH).bold().to_string());
            bar.set_message("");
        }
        handle
    }

    fn advance(&self, handle: SlotHandle, n: u64, item: &str) {
        lock(&self.table).advance(handle, n);
        if let Some(bar) = self.bars.get(handle.0) {
            bar.inc(n);
            bar.set_message(ellipsize_start(item, MAX_FILE_WIDTH));
        }
    }

    fn release(&self, handle: SlotHandle) {
        lock(&self.table).release(handle);
        if let Some(bar) = self.bars.get(handle.0) {
            bar.reset();
            bar.set_length(0);
            bar.set_prefix(idle_label(handle.0).dimmed().to_string());
            bar.set_message("");
        }
        self.overall.inc(1);
    }

    fn report_error(&self, n: u64) {
        let total = self.errors.fetch_add(n, Ordering::Relaxed) + n;
        self.overall.set_prefix(overall_label(total));
    }

    fn log(&self, message: &str) {
        let _ = self.multi.println(message);
    }

    fn stop(&self) {
        for bar in &self.bars {
            bar.finish_and_clear();
        }
        self.overall.finish();
        if self.routes_console {
            detach_display();
        }
    }
}

/// Label of the overall line, with the error tally once there is one
fn overall_label(errors: u64) -> String {
    if errors == 0 {
        "Overall".bold().to_string()
    } else {
        format!("{} {}", "Overall".bold(), format!("(E:{errors})").red())
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
