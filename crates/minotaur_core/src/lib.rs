//! # MINOTAUR Core Engine
//!
//! A six-face N x N color grid that many OS threads rotate and inspect
//! concurrently, without ever observing a half-applied rotation.
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────────────────────┐
//!                      │            Cube              │
//!                      │  rotate(face, layer)         │
//!                      │  snapshot()                  │
//!                      └──────┬───────────────┬───────┘
//!                             │               │
//!                  ┌──────────┴─────┐  ┌──────┴────────┐
//!                  │    AxisGate    │  │  LayerLocks   │
//!                  │ one axis group │  │ one exclusive │
//!                  │ active at a    │  │ lock per      │
//!                  │ time, FIFO     │  │ layer depth   │
//!                  │ turn queue     │  │               │
//!                  └──────────┬─────┘  └──────┬────────┘
//!                             │               │
//!                      ┌──────┴───────────────┴───────┐
//!                      │           CubeGrid           │
//!                      │  6 x N x N relaxed-atomic    │
//!                      │  cells + fixed ring table    │
//!                      └──────────────────────────────┘
//! ```
//!
//! ## Concurrency Rules
//!
//! 1. **One axis at a time** - all admitted threads share a single rotation
//!    axis (or the snapshot group); conflicting axes queue FIFO by turn
//! 2. **Disjoint layers run in parallel** - two rotations of the same axis
//!    but different depths never block each other
//! 3. **Same layer serializes** - a per-depth exclusive lock orders them
//! 4. **Blocked callers can be cancelled** - a [`CancelToken`] wakes every
//!    sleeper of its cube; bookkeeping is repaired before the error returns
//!
//! ## Example
//!
//! ```rust,ignore
//! use minotaur_core::{Cube, Face};
//!
//! let cube = Cube::new(3);
//! cube.rotate(Face::Up, 0)?;
//! let snap = cube.snapshot()?;
//! assert!(!snap.is_solved());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod observer;
pub mod sync;

pub use config::CubeConfig;
pub use cube::Cube;
pub use error::{CubeError, CubeResult};
pub use geometry::{Axis, Color, Face, SpinDirection, FACE_COUNT};
pub use grid::{CubeGrid, Snapshot};
pub use observer::{CubeObserver, NoopObserver};
pub use sync::CancelToken;
