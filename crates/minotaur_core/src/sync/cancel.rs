//! # Cooperative Cancellation
//!
//! A [`CancelToken`] lets the environment abort callers that are blocked
//! inside the gate or on a layer lock. Cancellation is cooperative:
//! [`cancel`](CancelToken::cancel) raises a flag and wakes every sleeper of
//! the owning cube; each cancellable wait rechecks its token inside its
//! predicate loop and backs out with valid bookkeeping
//! (broadcast-and-recheck). A call that already passed its last blocking
//! point completes normally; the flag stays set for later calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::cube::Cube;

/// Cancels calls blocked on one specific cube.
///
/// Obtained from [`Cube::cancel_token`] and passed to the `_with`
/// operation variants. Clones share the same flag, so one `cancel` aborts
/// every blocked call that carries any clone of this token. A token never
/// keeps its cube alive.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    cube: Weak<Cube>,
}

impl CancelToken {
    pub(crate) fn new(cube: Weak<Cube>) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            cube,
        }
    }

    /// Raises the cancellation flag and wakes every thread blocked on the
    /// owning cube so it can observe the flag. Idempotent.
    pub fn cancel(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            if let Some(cube) = self.cube.upgrade() {
                cube.wake_cancelled_waiters();
            }
        }
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Flag check for an optional token; an absent token is never cancelled.
#[inline]
pub(crate) fn flagged(cancel: Option<&CancelToken>) -> bool {
    cancel.is_some_and(CancelToken::is_cancelled)
}
