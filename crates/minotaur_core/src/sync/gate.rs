//! # Axis Gate
//!
//! The admission monitor at the heart of the engine. Callers are grouped by
//! rotation axis (plus a dedicated snapshot group); exactly one group holds
//! the gate at any instant, any number of threads may be admitted under it,
//! and conflicting groups take FIFO turns.
//!
//! ## Protocol
//!
//! ```text
//!  enter(G):                              exit():
//!    gate idle, nobody queued ──► go        admitted count -1
//!    G active, nobody queued  ──► go        count hits 0 ──► grant the
//!    otherwise:                             longest-waiting leader, or
//!      first waiter of G  = LEADER          fall idle
//!      later waiters of G = FOLLOWERS
//! ```
//!
//! The **leader** commits its group to the turn queue and waits,
//! *uncancellably*, until the exit protocol grants it the turn - abandoning
//! leadership would strand everyone queued behind it. On grant the leader
//! activates the group, **absorbs every registered follower into the
//! admitted count**, and broadcasts. Absorption is what makes a turn
//! atomic: the gate cannot fall idle or switch groups until the whole
//! group that was promised the turn has passed through and exited, exactly
//! like a baton handed down a semaphore chain.
//!
//! **Followers** wait cancellably. Each records the group's activation
//! epoch when it queues; it is admitted only by a *newer* activation, so a
//! thread that queues behind an already-running turn (because other groups
//! are waiting) cannot sneak into that turn and starve the queue.
//!
//! The coordinator mutex guards O(1) bookkeeping only; it is never held
//! across a caller's hooks or grid work.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::error::{CubeError, CubeResult};
use crate::geometry::Axis;
use crate::sync::cancel::{flagged, CancelToken};

/// Number of admission groups: three rotation axes plus the snapshot group.
pub(crate) const GROUP_COUNT: usize = 4;

/// An admission group: one per rotation axis, plus the read-only snapshot
/// group, which excludes all rotation while active but admits any number
/// of concurrent readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateGroup {
    /// Rotations around the `Up`/`Down` axis.
    UpDown,
    /// Rotations around the `Left`/`Right` axis.
    LeftRight,
    /// Rotations around the `Front`/`Back` axis.
    FrontBack,
    /// Full-grid snapshot reads.
    Snapshot,
}

impl GateGroup {
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::UpDown => 0,
            Self::LeftRight => 1,
            Self::FrontBack => 2,
            Self::Snapshot => 3,
        }
    }
}

impl From<Axis> for GateGroup {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::UpDown => Self::UpDown,
            Axis::LeftRight => Self::LeftRight,
            Axis::FrontBack => Self::FrontBack,
        }
    }
}

/// Coordinator bookkeeping, all guarded by one mutex.
struct GateState {
    /// Group currently holding the gate, if any.
    active: Option<GateGroup>,
    /// Threads admitted under `active`, including absorbed followers that
    /// have not woken yet.
    active_count: usize,
    /// Registered waiters per group: the leader plus its followers.
    waiting: [usize; GROUP_COUNT],
    /// FIFO of groups whose leader has committed to a turn.
    pending: VecDeque<GateGroup>,
    /// Turn handed out by the exit protocol, not yet claimed by its leader.
    grant: Option<GateGroup>,
    /// Per-group activation counter; a follower queued with ticket `e` is
    /// admitted only once its group is active with an epoch other than `e`.
    epoch: [u64; GROUP_COUNT],
}

/// Group-based, FIFO-fair admission gate.
pub(crate) struct AxisGate {
    state: Mutex<GateState>,
    /// Wakes committed leaders; granted leader self-selects by predicate.
    leader_cv: Condvar,
    /// Wakes one group's followers on activation or cancellation.
    follower_cv: [Condvar; GROUP_COUNT],
}

impl AxisGate {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                active: None,
                active_count: 0,
                waiting: [0; GROUP_COUNT],
                pending: VecDeque::new(),
                grant: None,
                epoch: [0; GROUP_COUNT],
            }),
            leader_cv: Condvar::new(),
            follower_cv: [
                Condvar::new(),
                Condvar::new(),
                Condvar::new(),
                Condvar::new(),
            ],
        }
    }

    /// Admits the calling thread under `group`, blocking while conflicting
    /// groups hold or are queued for the gate.
    ///
    /// The returned pass runs the exit protocol when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if `cancel` fires while waiting as
    /// a follower. Leader waits never cancel; a leader whose token fired
    /// is admitted first and the cancellation surfaces at the caller's
    /// next blocking point.
    pub(crate) fn enter(
        &self,
        group: GateGroup,
        cancel: Option<&CancelToken>,
    ) -> CubeResult<GatePass<'_>> {
        let g = group.index();
        let mut s = self.state.lock();

        // fast path: gate idle and nobody queued for a turn
        if s.active.is_none() && s.grant.is_none() && s.pending.is_empty() {
            debug_assert_eq!(s.active_count, 0);
            s.active = Some(group);
            s.epoch[g] = s.epoch[g].wrapping_add(1);
            s.active_count = 1;
            trace!(?group, "gate: activated idle gate");
            return Ok(GatePass { gate: self });
        }

        // fast path: join the running group while no other group is queued
        if s.active == Some(group) && s.pending.is_empty() {
            s.active_count += 1;
            trace!(?group, count = s.active_count, "gate: joined active group");
            return Ok(GatePass { gate: self });
        }

        s.waiting[g] += 1;
        if s.waiting[g] == 1 {
            // leader: commit the group to the turn queue; not cancellable
            s.pending.push_back(group);
            trace!(?group, "gate: leading a new turn");
            while s.grant != Some(group) {
                self.leader_cv.wait(&mut s);
            }
            s.grant = None;
            s.active = Some(group);
            s.epoch[g] = s.epoch[g].wrapping_add(1);
            s.waiting[g] -= 1;
            // absorb the whole group: the turn cannot end before every
            // member woken by this activation has exited
            s.active_count += 1 + s.waiting[g];
            trace!(?group, absorbed = s.waiting[g], "gate: turn granted");
            self.follower_cv[g].notify_all();
        } else {
            // follower: cancellable wait for this group's next activation
            let ticket = s.epoch[g];
            loop {
                if s.active == Some(group) && s.epoch[g] != ticket {
                    break;
                }
                if flagged(cancel) {
                    s.waiting[g] -= 1;
                    trace!(?group, "gate: follower cancelled while queued");
                    return Err(CubeError::Cancelled);
                }
                self.follower_cv[g].wait(&mut s);
            }
            s.waiting[g] -= 1;
            if flagged(cancel) {
                // the leader already counted this thread into the turn, so
                // run the full exit protocol before reporting cancellation
                self.exit_locked(&mut s);
                trace!(?group, "gate: follower cancelled after admission");
                return Err(CubeError::Cancelled);
            }
            // admitted; the leader already incremented active_count
        }
        Ok(GatePass { gate: self })
    }

    /// Exit protocol body; caller holds the state lock.
    fn exit_locked(&self, s: &mut GateState) {
        s.active_count -= 1;
        if s.active_count == 0 {
            s.active = None;
            if let Some(next) = s.pending.pop_front() {
                // the only place a group switch happens
                s.grant = Some(next);
                trace!(?next, "gate: handing turn to next group");
                self.leader_cv.notify_all();
            } else {
                trace!("gate: idle");
            }
        }
    }

    /// Wakes every cancellable sleeper so predicate loops can observe a
    /// freshly raised cancellation flag.
    pub(crate) fn wake_cancel_waiters(&self) {
        let _s = self.state.lock();
        for cv in &self.follower_cv {
            cv.notify_all();
        }
    }

    #[cfg(test)]
    fn active_group(&self) -> Option<GateGroup> {
        self.state.lock().active
    }

    #[cfg(test)]
    fn admitted_count(&self) -> usize {
        self.state.lock().active_count
    }
}

/// RAII admission pass; dropping it runs the exit protocol.
pub(crate) struct GatePass<'a> {
    gate: &'a AxisGate,
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        let mut s = self.gate.state.lock();
        self.gate.exit_locked(&mut s);
    }
}
