//! Runtime configuration
//!
//! Configuration is plain data handed to constructors; nothing reads it from a
//! global. Every field has a default, so a YAML file only needs the keys it
//! changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default snapshot size at which `nodes_by` switches to a parallel filter
pub const DEFAULT_PARALLEL_FILTER_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Snapshot file loaded at startup by the demo binary
    pub snapshot_path: Option<PathBuf>,

    pub parallel_filter_threshold: usize,

    /// Copy edges between matched nodes into query results
    pub project_query_edges: bool,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            parallel_filter_threshold: DEFAULT_PARALLEL_FILTER_THRESHOLD,
            project_query_edges: false,
        }
    }
}

impl DraftConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
