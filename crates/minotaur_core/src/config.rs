//! # Engine Configuration
//!
//! Construction parameters for a cube, loadable from an external TOML file.
//! Configs are parsed once at startup and validated before any engine
//! object is built.

use serde::Deserialize;

use crate::error::{CubeError, CubeResult};

/// Default edge length when none is configured.
pub const DEFAULT_SIZE: usize = 3;

/// Construction configuration for a [`Cube`](crate::Cube).
///
/// # Example
///
/// ```rust,ignore
/// let config = CubeConfig::from_toml_str("size = 5")?;
/// let cube = Cube::from_config(&config)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CubeConfig {
    /// Edge length N of the cube. Must be at least 1.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

impl CubeConfig {
    /// Creates a configuration with the given edge length.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] if the text is not valid TOML
    /// or the values fail [`validate`](Self::validate).
    pub fn from_toml_str(raw: &str) -> CubeResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| CubeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a buildable cube.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidConfig`] if `size` is zero.
    pub fn validate(&self) -> CubeResult<()> {
        if self.size == 0 {
            return Err(CubeError::InvalidConfig(
                "cube size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
