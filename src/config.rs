//! Queue configuration.
//!
//! # Configuration Precedence
//!
//! 1. **Programmatic**: fields set directly on [`QueueConfig`]
//! 2. **Environment variables**: `READYQ_*`, applied by [`QueueConfig::apply_env_overrides`]
//! 3. **Config file**: a TOML `[queue]` table (requires the `config-file` feature)
//! 4. **Defaults**: [`QueueConfig::default()`]
//!
//! # Defaults
//!
//! | Field | Default | Env var |
//! |-------|---------|---------|
//! | `initial_capacity` | 8 | `READYQ_INITIAL_CAPACITY` |
//! | `pending_warn_threshold` | 0 (disabled) | `READYQ_PENDING_WARN_THRESHOLD` |
//! | `max_dependency_depth` | 64 | `READYQ_MAX_DEPENDENCY_DEPTH` |

use crate::error::{ConfigError, Result};

/// Environment variable for [`QueueConfig::initial_capacity`].
pub const ENV_INITIAL_CAPACITY: &str = "READYQ_INITIAL_CAPACITY";
/// Environment variable for [`QueueConfig::pending_warn_threshold`].
pub const ENV_PENDING_WARN_THRESHOLD: &str = "READYQ_PENDING_WARN_THRESHOLD";
/// Environment variable for [`QueueConfig::max_dependency_depth`].
pub const ENV_MAX_DEPENDENCY_DEPTH: &str = "READYQ_MAX_DEPENDENCY_DEPTH";

/// Tunables shared by every queue flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Slots pre-allocated in each of `front` and `pending`.
    pub initial_capacity: usize,
    /// Log a warning whenever `pending` grows past this many entries (0 = never).
    pub pending_warn_threshold: usize,
    /// Maximum parent links followed when resolving stream ancestry.
    pub max_dependency_depth: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 8,
            pending_warn_threshold: 0,
            max_dependency_depth: 64,
        }
    }
}

impl QueueConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `READYQ_*` variables that are set. Unset variables leave the
    /// field untouched; set but unparseable ones are an error.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(val) = read_env(ENV_INITIAL_CAPACITY) {
            self.initial_capacity = parse_usize(ENV_INITIAL_CAPACITY, &val)?;
        }
        if let Some(val) = read_env(ENV_PENDING_WARN_THRESHOLD) {
            self.pending_warn_threshold = parse_usize(ENV_PENDING_WARN_THRESHOLD, &val)?;
        }
        if let Some(val) = read_env(ENV_MAX_DEPENDENCY_DEPTH) {
            self.max_dependency_depth = parse_usize(ENV_MAX_DEPENDENCY_DEPTH, &val)?;
        }
        Ok(())
    }

    /// Checks field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_dependency_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_dependency_depth",
                reason: "must be >= 1",
            });
        }
        Ok(())
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_usize(var: &'static str, val: &str) -> Result<usize> {
    val.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidEnv {
            var,
            expected: "unsigned integer",
            value: val.to_string(),
        })
}

// =========================================================================
// TOML config file support (feature-gated)
// =========================================================================

/// TOML-deserializable queue configuration.
///
/// ```toml
/// [queue]
/// initial_capacity = 16
/// pending_warn_threshold = 1024
/// max_dependency_depth = 32
/// ```
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct QueueTomlConfig {
    /// Queue settings.
    #[serde(default)]
    pub queue: QueueToml,
}

/// `[queue]` section of the TOML config.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct QueueToml {
    /// Pre-allocated slots per sequence.
    pub initial_capacity: Option<usize>,
    /// Pending-length warning threshold.
    pub pending_warn_threshold: Option<usize>,
    /// Ancestry walk bound.
    pub max_dependency_depth: Option<usize>,
}

/// Applies the fields present in `toml` to `config`.
#[cfg(feature = "config-file")]
pub fn apply_toml_config(config: &mut QueueConfig, toml: &QueueTomlConfig) {
    if let Some(v) = toml.queue.initial_capacity {
        config.initial_capacity = v;
    }
    if let Some(v) = toml.queue.pending_warn_threshold {
        config.pending_warn_threshold = v;
    }
    if let Some(v) = toml.queue.max_dependency_depth {
        config.max_dependency_depth = v;
    }
}

/// Parses a TOML string.
#[cfg(feature = "config-file")]
pub fn parse_toml_str(toml_str: &str) -> Result<QueueTomlConfig> {
    Ok(toml::from_str(toml_str)?)
}

/// Reads and parses a TOML file.
#[cfg(feature = "config-file")]
pub fn parse_toml_file(path: &std::path::Path) -> Result<QueueTomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml_str(&content)
}

/// Loads a config file, then applies environment overrides on top.
#[cfg(feature = "config-file")]
pub fn load(path: &std::path::Path) -> Result<QueueConfig> {
    let mut config = QueueConfig::default();
    apply_toml_config(&mut config, &parse_toml_file(path)?);
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
