//! # Engine Error Types
//!
//! All errors that can escape a cube operation.
//!
//! There is exactly one runtime failure mode, [`CubeError::Cancelled`]: a
//! caller was cancelled while blocked waiting for admission or for a layer
//! lock. The remaining variants are fail-fast argument and configuration
//! validation; they are produced before any lock is taken.
//!
//! On every error path the grid is untouched and the gate/layer bookkeeping
//! is left valid for all other threads. Nothing is retried internally and no
//! error poisons the cube.

use thiserror::Error;

/// Errors that can occur while operating a cube.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// The calling thread was cancelled while blocked waiting for axis
    /// admission or for a layer lock. The grid was not modified.
    #[error("operation cancelled while waiting for cube access")]
    Cancelled,

    /// Requested layer does not exist on a cube of this size.
    #[error("layer {layer} out of range for cube of size {size}")]
    LayerOutOfRange {
        /// The layer that was requested.
        layer: usize,
        /// The edge length of the cube.
        size: usize,
    },

    /// Raw face index outside `0..=5`.
    #[error("invalid face index: {0}")]
    InvalidFace(u8),

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for cube operations.
pub type CubeResult<T> = Result<T, CubeError>;
