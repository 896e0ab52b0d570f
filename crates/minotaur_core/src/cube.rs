//! # Cube Facade
//!
//! The public engine object. Every operation follows the same shape:
//! derive the admission group, pass the [`AxisGate`], take the layer lock
//! if the grid will be mutated, run the caller's hooks around the grid
//! work, then release everything in reverse order. RAII passes and guards
//! make the release order automatic and keep the bookkeeping correct even
//! when a wait is cancelled midway.

use std::sync::Arc;

use tracing::trace;

use crate::config::CubeConfig;
use crate::error::{CubeError, CubeResult};
use crate::geometry::{physical_depth, Face};
use crate::grid::{CubeGrid, Snapshot};
use crate::observer::{CubeObserver, NoopObserver};
use crate::sync::gate::{AxisGate, GateGroup};
use crate::sync::layers::LayerLocks;
use crate::sync::CancelToken;

/// A concurrently rotatable six-face N x N puzzle.
///
/// Any number of threads may call [`rotate`](Self::rotate) and
/// [`snapshot`](Self::snapshot) at the same time. Rotations around the
/// same axis run in parallel when they move disjoint layers; rotations of
/// the same physical layer serialize; rotations around different axes, and
/// snapshots, take FIFO turns at the gate. Snapshots never observe a
/// half-applied rotation.
///
/// ## Example
///
/// ```rust,ignore
/// let cube = Cube::new(3);
/// let worker = Arc::clone(&cube);
/// std::thread::spawn(move || worker.rotate(Face::Left, 2));
/// cube.rotate(Face::Up, 0)?;
/// println!("{}", cube.snapshot()?);
/// ```
pub struct Cube {
    size: usize,
    grid: CubeGrid,
    gate: AxisGate,
    layers: LayerLocks,
    observer: Arc<dyn CubeObserver>,
}

impl std::fmt::Debug for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cube").field("size", &self.size).finish_non_exhaustive()
    }
}

impl Cube {
    /// Creates a solved cube of edge length `size` with no hooks.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: usize) -> Arc<Self> {
        Self::with_observer(size, Arc::new(NoopObserver))
    }

    /// Creates a solved cube whose operations invoke `observer` hooks.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn with_observer(size: usize, observer: Arc<dyn CubeObserver>) -> Arc<Self> {
        assert!(size >= 1, "cube size must be at least 1");
        Arc::new(Self {
            size,
            grid: CubeGrid::new(size),
            gate: AxisGate::new(),
            layers: LayerLocks::new(size),
            observer,
        })
    }

    /// Creates a cube from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] if the configuration fails
    /// [`CubeConfig::validate`].
    pub fn from_config(config: &CubeConfig) -> CubeResult<Arc<Self>> {
        config.validate()?;
        Ok(Self::new(config.size))
    }

    /// Edge length N of the cube.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Creates a token that can cancel calls blocked on this cube.
    #[must_use]
    pub fn cancel_token(self: &Arc<Self>) -> CancelToken {
        CancelToken::new(Arc::downgrade(self))
    }

    /// Rotates layer `layer` of the cube as seen from `face`, 90 degrees
    /// clockwise when looking at that face.
    ///
    /// Blocks while a conflicting axis group holds the gate or another
    /// rotation holds the same physical layer. This variant cannot be
    /// cancelled; see [`rotate_with`](Self::rotate_with).
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::LayerOutOfRange`] if `layer >= size`, before
    /// any lock is taken.
    pub fn rotate(&self, face: Face, layer: usize) -> CubeResult<()> {
        self.rotate_impl(face, layer, None)
    }

    /// Like [`rotate`](Self::rotate), but aborts with
    /// [`CubeError::Cancelled`] if `cancel` fires while the call is
    /// blocked. A cancelled call leaves the grid untouched and the
    /// admission bookkeeping valid for every other thread.
    pub fn rotate_with(&self, face: Face, layer: usize, cancel: &CancelToken) -> CubeResult<()> {
        self.rotate_impl(face, layer, Some(cancel))
    }

    /// Returns a consistent copy of all 6 x N x N cells, face-major,
    /// row-major, column-major.
    ///
    /// Blocks while any rotation axis holds the gate; concurrent snapshots
    /// run together. This variant cannot be cancelled; see
    /// [`snapshot_with`](Self::snapshot_with).
    ///
    /// # Errors
    ///
    /// Infallible today; the `Result` is part of the operation contract
    /// shared with [`snapshot_with`](Self::snapshot_with).
    pub fn snapshot(&self) -> CubeResult<Snapshot> {
        self.snapshot_impl(None)
    }

    /// Like [`snapshot`](Self::snapshot), but aborts with
    /// [`CubeError::Cancelled`] if `cancel` fires while the call is
    /// blocked waiting for admission.
    pub fn snapshot_with(&self, cancel: &CancelToken) -> CubeResult<Snapshot> {
        self.snapshot_impl(Some(cancel))
    }

    fn rotate_impl(
        &self,
        face: Face,
        layer: usize,
        cancel: Option<&CancelToken>,
    ) -> CubeResult<()> {
        if layer >= self.size {
            return Err(CubeError::LayerOutOfRange {
                layer,
                size: self.size,
            });
        }
        let depth = physical_depth(face, layer, self.size);

        let pass = self.gate.enter(face.axis().into(), cancel)?;
        // a cancelled layer wait drops `pass`, which runs the exit protocol
        let slot = self.layers.acquire(depth, cancel)?;

        self.observer.before_rotation(face, layer);
        self.grid.rotate_layer(face, layer);
        self.observer.after_rotation(face, layer);
        trace!(?face, layer, depth, "rotation applied");

        drop(slot);
        drop(pass);
        Ok(())
    }

    fn snapshot_impl(&self, cancel: Option<&CancelToken>) -> CubeResult<Snapshot> {
        let pass = self.gate.enter(GateGroup::Snapshot, cancel)?;

        self.observer.before_snapshot();
        let snapshot = self.grid.snapshot();
        self.observer.after_snapshot();
        trace!(size = self.size, "snapshot taken");

        drop(pass);
        Ok(snapshot)
    }

    /// Wakes every thread blocked on this cube; called by a firing
    /// [`CancelToken`].
    pub(crate) fn wake_cancelled_waiters(&self) {
        self.gate.wake_cancel_waiters();
        self.layers.wake_cancel_waiters();
    }
}
