// @file selection.rs
// @brief selection epochs, so a superseded cycle never paints over a newer one

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out one ticket per party selection. Only the most recently issued ticket is
/// current; everything issued before it is stale.
#[derive(Clone, Debug, Default)]
pub struct SelectionClock {
    epoch: Arc<AtomicU64>,
}

impl SelectionClock {
    pub fn new() -> SelectionClock {
        SelectionClock::default()
    }

    pub fn begin(&self) -> SelectionTicket {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("selection #{epoch} started");
        SelectionTicket {
            epoch,
            clock: self.epoch.clone(),
        }
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

#[derive(Clone, Debug)]
pub struct SelectionTicket {
    epoch: u64,
    clock: Arc<AtomicU64>,
}

impl SelectionTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self) -> bool {
        self.clock.load(Ordering::Acquire) == self.epoch
    }

    /// Supersedes this ticket without starting a new selection. No-op if it is
    /// already stale.
    pub fn cancel(&self) {
        let _ = self
            .clock
            .compare_exchange(self.epoch, self.epoch + 1, Ordering::AcqRel, Ordering::Acquire);
    }
}
