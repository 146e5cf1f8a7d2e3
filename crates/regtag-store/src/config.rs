//! Tag store configuration.
//!
//! Selects the storage backend and bounds the fan-out of reverse lookups.
//! Defaults give an in-memory backend and 10 concurrent lookup reads.
//! Override via environment variables, a YAML file, or explicit
//! construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regtag_driver::{FilesystemDriver, InMemoryDriver, StorageDriver};
use serde::Deserialize;
use tokio::sync::Semaphore;

/// Default upper bound on concurrently outstanding lookup reads.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 10;

/// Which storage backend to use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "driver", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Process-local, non-persistent storage.
    #[default]
    InMemory,
    /// A local directory tree.
    Filesystem {
        /// Root directory of the tree.
        root: PathBuf,
    },
}

impl StorageConfig {
    /// Construct the configured driver.
    pub fn build_driver(&self) -> Arc<dyn StorageDriver> {
        match self {
            Self::InMemory => Arc::new(InMemoryDriver::new()),
            Self::Filesystem { root } => Arc::new(FilesystemDriver::new(root.clone())),
        }
    }
}

/// Configuration for a [`TagStore`](crate::TagStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TagStoreConfig {
    /// Maximum number of tag links read concurrently by a lookup.
    pub lookup_concurrency: usize,
    /// Storage backend.
    pub storage: StorageConfig,
}

impl Default for TagStoreConfig {
    fn default() -> Self {
        Self {
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            storage: StorageConfig::default(),
        }
    }
}

impl TagStoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `REGTAG_LOOKUP_CONCURRENCY` (default: 10)
    /// - `REGTAG_STORAGE_ROOT` (filesystem backend rooted here; in-memory if unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup_concurrency = match std::env::var("REGTAG_LOOKUP_CONCURRENCY") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: "REGTAG_LOOKUP_CONCURRENCY".to_string(),
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_LOOKUP_CONCURRENCY,
        };
        let storage = match std::env::var_os("REGTAG_STORAGE_ROOT") {
            Some(root) => StorageConfig::Filesystem { root: root.into() },
            None => StorageConfig::InMemory,
        };

        let config = Self {
            lookup_concurrency,
            storage,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.lookup_concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError::ConcurrencyTooLarge {
                value: self.lookup_concurrency,
                max: Semaphore::MAX_PERMITS,
            });
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
    #[error("lookup_concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("lookup_concurrency {value} exceeds the maximum of {max}")]
    ConcurrencyTooLarge { value: usize, max: usize },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
