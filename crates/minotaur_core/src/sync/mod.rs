//! # Synchronization Layer
//!
//! The admission machinery that lets many threads work the grid at once
//! without ever conflicting:
//!
//! ```text
//! caller ──► AxisGate.enter(group) ──► LayerLocks.acquire(depth) ──► grid
//!                 │                          │
//!                 │  one group active at     │  one rotation per layer
//!                 │  a time, FIFO turns      │  depth at a time
//!                 ▼                          ▼
//!            GatePass (exit on drop)    LayerGuard (release on drop)
//! ```
//!
//! Snapshots enter the gate under a dedicated read group and skip the layer
//! locks entirely, so any number of snapshots run together once admitted.
//!
//! Every blocking wait in this module is either uncancellable by design
//! (the leader wait, see [`gate`]) or watches a [`CancelToken`] in its
//! predicate loop and is woken by [`CancelToken::cancel`].

pub(crate) mod gate;
pub(crate) mod layers;

mod cancel;

pub use cancel::CancelToken;
