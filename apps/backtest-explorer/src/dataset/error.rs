//! Dataset loading error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a single source document cannot be loaded.
///
/// These never abort a batch: the document is skipped and the failure lands
/// in the [`NormalizationReport`](super::NormalizationReport).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DocumentError {
    /// Document is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Top-level value is not an object.
    #[error("top-level value is not an object")]
    NotAnObject,

    /// The `trades` field is absent.
    #[error("missing `trades` field")]
    MissingTrades,

    /// A top-level field has the wrong type.
    #[error("field `{0}` is not an array")]
    NotAnArray(String),
}

/// Errors reading documents from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a folder or document.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },
}
