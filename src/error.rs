//! Error types.
//!
//! Queue operations themselves are infallible: an empty scan or an unknown
//! stream id is an ordinary outcome, and misuse of the unsynchronized queue
//! (peeking an empty `front`) is a panic. The only recoverable failures come
//! from loading configuration.

use std::path::PathBuf;

/// Errors raised while building a [`QueueConfig`](crate::config::QueueConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Expected value shape.
        expected: &'static str,
        /// Raw value found in the environment.
        value: String,
    },

    /// A field holds a value outside its valid range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`QueueTomlConfig`](crate::config::QueueTomlConfig).
    #[cfg(feature = "config-file")]
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
