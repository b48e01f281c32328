//! Configuration error types.
//!
//! The simulation itself has no recoverable failure modes: every tick accepts
//! any finite input and produces a valid state.  Errors only arise at the edge
//! where tunables are read from disk, so this enum stays small.
//!
//! ## Usage
//!
//! ```rust
//! use torus_roids::config::GameConfig;
//! use torus_roids::error::SimResult;
//!
//! fn load() -> SimResult<GameConfig> {
//!     let config = GameConfig::from_toml_str("world_width = 2000.0")?;
//!     config.validate()?;
//!     Ok(config)
//! }
//! # load().unwrap();
//! ```

use std::fmt;
use std::io;

/// Top-level error enum for configuring the simulation.
#[derive(Debug)]
pub enum SimError {
    /// A tunable is outside the range the simulation can operate in.
    InvalidConfig {
        /// Name of the offending config field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The config file exists but could not be read.
    ConfigRead {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The config file was read but is not valid TOML for [`GameConfig`].
    ///
    /// [`GameConfig`]: crate::config::GameConfig
    ConfigParse {
        /// Path of the file, or `"<inline>"` for string input.
        path: String,
        /// Underlying parser failure.
        source: toml::de::Error,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
            SimError::ConfigRead { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            SimError::ConfigParse { path, source } => {
                write!(f, "failed to parse config '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::InvalidConfig { .. } => None,
            SimError::ConfigRead { source, .. } => Some(source),
            SimError::ConfigParse { source, .. } => Some(source),
        }
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            name,
            value,
            expected: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn require_non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            name,
            value,
            expected: "[0.0, ∞)",
        })
    }
}
