//! Settings document errors.

use thiserror::Error;

/// Errors reading or decoding a settings document.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The document is not valid JSON, not an object, or a present field
    /// has the wrong type.
    #[error("Malformed settings document: {0}")]
    Malformed(String),

    /// Failed to read or write a settings file.
    #[error("Settings file '{path}': {source}")]
    Io {
        /// Path to the settings file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },
}
