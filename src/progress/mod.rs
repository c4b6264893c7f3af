//! Progress reporting
//!
//! The scheduler reports through the [`Progress`] trait, so the renaming
//! logic runs the same with a live terminal display ([`TerminalProgress`])
//! or without one ([`NoProgress`]). Reporting is best-effort: no operation
//! returns an error, and a display problem never stops a run.

mod terminal;

pub use terminal::TerminalProgress;

/// Identifies a display slot claimed by a folder task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(pub usize);

/// Live progress sink shared by all folder tasks of a run
pub trait Progress: Send + Sync {
    /// Claims a slot for a folder with `total` files
    fn acquire_slot(&self, label: &str, total: u64) -> SlotHandle;

    /// Moves a slot forward by `n` and shows `item` as the current file
    fn advance(&self, handle: SlotHandle, n: u64, item: &str);

    /// Returns a slot to the idle pool and counts one more folder as done
    fn release(&self, handle: SlotHandle);

    /// Adds `n` to the error tally shown on the overall line
    fn report_error(&self, n: u64);

    /// Prints a line above the live display
    fn log(&self, message: &str);

    /// Tears the display down
    fn stop(&self);
}

/// Progress sink that shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn acquire_slot(&self, _label: &str, _total: u64) -> SlotHandle {
        SlotHandle(0)
    }

    fn advance(&self, _handle: SlotHandle, _n: u64, _item: &str) {}

    fn release(&self, _handle: SlotHandle) {}

    fn report_error(&self, _n: u64) {}

    fn log(&self, _message: &str) {}

    fn stop(&self) {}
}

/// State of one display slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSlot {
    pub busy: bool,
    pub label: String,
    pub current: u64,
    pub total: u64,
}

impl ProgressSlot {
    fn idle(index: usize) -> Self {
        ProgressSlot {
            busy: false,
            label: idle_label(index),
            current: 0,
            total: 0,
        }
    }
}

/// Label of a slot nobody is using
pub fn idle_label(index: usize) -> String {
    format!("Idle {}", index + 1)
}

/// Bookkeeping for a fixed set of reusable slots
///
/// There is always at least one slot. When every slot is busy, slot 0 is
/// handed out again.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<ProgressSlot>,
}

impl SlotTable {
    pub fn new(count: usize) -> Self {
        SlotTable {
            slots: (0..count.max(1)).map(ProgressSlot::idle).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[ProgressSlot] {
        &self.slots
    }

    pub fn get(&self, handle: SlotHandle) -> Option<&ProgressSlot> {
        self.slots.get(handle.0)
    }

    /// Claims the first idle slot, or slot 0 if none is idle
    pub fn acquire(&mut self, label: &str, total: u64) -> SlotHandle {
        let index = self.slots.iter().position(|slot| !slot.busy).unwrap_or(0);
        let slot = &mut self.slots[index];
        slot.busy = true;
        slot.label = label.to_string();
        slot.current = 0;
        slot.total = total;
        SlotHandle(index)
    }

    pub fn advance(&mut self, handle: SlotHandle, n: u64) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.current = slot.current.saturating_add(n);
        }
    }

    pub fn release(&mut self, handle: SlotHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = ProgressSlot::idle(handle.0);
        }
    }
}
