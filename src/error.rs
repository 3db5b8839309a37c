//! Configuration errors.
//!
//! The ternary algebra and every synthesis, learning and repair operation are
//! total, so the only thing that can be rejected is a configuration value.

use thiserror::Error;

/// A configuration value is outside its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// EMA decay must be in `(0.0, 1.0]`.
    #[error("decay {value} is out of range (0.0, 1.0]")]
    DecayOutOfRange {
        /// The rejected value.
        value: f32,
    },

    /// A similarity threshold is larger than any similarity can be.
    #[error("similarity threshold '{name}' = {value} exceeds the maximum of {max}")]
    ThresholdOutOfRange {
        /// Field name.
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A bounded bank must hold at least one prototype.
    #[error("bank capacity must be at least 1")]
    ZeroCapacity,

    /// The Transcender explores between one and three wirings.
    #[error("max_tries {value} is out of range [1, 3]")]
    MaxTriesOutOfRange {
        /// The rejected value.
        value: usize,
    },
}
