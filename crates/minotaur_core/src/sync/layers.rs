//! # Layer Locks
//!
//! One exclusive lock per physical layer depth. Two rotations that move the
//! same slice - including the same slice addressed from opposite caps -
//! contend here; rotations of disjoint depths never touch each other.
//!
//! Acquisition blocks only while the caller already holds axis admission,
//! and is cancellable: a fired [`CancelToken`] aborts the wait with the
//! lock bank left untouched. Releases broadcast rather than signal so a
//! waiter that wakes only to cancel can never swallow the wakeup another
//! waiter needed.

use parking_lot::{Condvar, Mutex};

use crate::error::{CubeError, CubeResult};
use crate::sync::cancel::{flagged, CancelToken};

struct LayerSlot {
    busy: Mutex<bool>,
    unlocked: Condvar,
}

/// Bank of per-depth exclusive locks.
pub(crate) struct LayerLocks {
    slots: Box<[LayerSlot]>,
}

impl LayerLocks {
    pub(crate) fn new(count: usize) -> Self {
        let slots = (0..count)
            .map(|_| LayerSlot {
                busy: Mutex::new(false),
                unlocked: Condvar::new(),
            })
            .collect();
        Self { slots }
    }

    /// Acquires the exclusive lock for `depth`, blocking while another
    /// rotation holds it.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if `cancel` has fired, checked
    /// before each blocking wait and before an immediate acquisition.
    pub(crate) fn acquire(
        &self,
        depth: usize,
        cancel: Option<&CancelToken>,
    ) -> CubeResult<LayerGuard<'_>> {
        let slot = &self.slots[depth];
        let mut busy = slot.busy.lock();
        loop {
            if flagged(cancel) {
                return Err(CubeError::Cancelled);
            }
            if !*busy {
                break;
            }
            slot.unlocked.wait(&mut busy);
        }
        *busy = true;
        Ok(LayerGuard { locks: self, depth })
    }

    /// Wakes every blocked acquirer so predicate loops can observe a
    /// freshly raised cancellation flag.
    pub(crate) fn wake_cancel_waiters(&self) {
        for slot in &self.slots {
            let _busy = slot.busy.lock();
            slot.unlocked.notify_all();
        }
    }
}

/// RAII layer lock; dropping it releases the depth and wakes waiters.
pub(crate) struct LayerGuard<'a> {
    locks: &'a LayerLocks,
    depth: usize,
}

impl Drop for LayerGuard<'_> {
    fn drop(&mut self) {
        let slot = &self.locks.slots[self.depth];
        let mut busy = slot.busy.lock();
        *busy = false;
        slot.unlocked.notify_all();
    }
}
