//! Data source and cache configuration.

use serde::{Deserialize, Serialize};

use crate::filter::DEFAULT_CACHE_CAPACITY;

/// Where backtest result documents are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Folder holding the result documents.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// File extension of result documents, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            extension: default_extension(),
        }
    }
}

fn default_folder() -> String {
    "data".to_string()
}

fn default_extension() -> String {
    "json".to_string()
}

/// View cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached views. Zero disables caching.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

const fn default_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}
