//! `[store]` configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Comment database location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path (relative to the config file).
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "comments.db".into(),
        }
    }
}
