//! # Operation Hooks
//!
//! An injected capability that gets called around every grid mutation and
//! every snapshot read. Hooks run synchronously on the calling thread while
//! it holds the relevant locks, so they see a frozen view of the slices the
//! operation touches - useful for verification harnesses, animation, or
//! bookkeeping layered on top of the engine.

use crate::geometry::Face;

/// Callbacks invoked around cube operations.
///
/// `before_rotation`/`after_rotation` run immediately around the grid
/// mutation, still holding axis admission and the layer lock.
/// `before_snapshot`/`after_snapshot` run around the full-grid read, still
/// holding admission for the snapshot group.
///
/// Implementations must not block indefinitely and must not re-enter
/// [`rotate`](crate::Cube::rotate) or [`snapshot`](crate::Cube::snapshot)
/// on the same cube from the same thread - that would deadlock against the
/// locks already held.
pub trait CubeObserver: Send + Sync {
    /// Called just before a layer rotation mutates the grid.
    fn before_rotation(&self, _face: Face, _layer: usize) {}

    /// Called just after a layer rotation mutated the grid.
    fn after_rotation(&self, _face: Face, _layer: usize) {}

    /// Called just before a snapshot reads the grid.
    fn before_snapshot(&self) {}

    /// Called just after a snapshot read the grid.
    fn after_snapshot(&self) {}
}

/// Observer that does nothing. The default for cubes built without hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CubeObserver for NoopObserver {}
