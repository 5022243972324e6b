//! Error type for dictionary operations.

use std::path::PathBuf;

/// Error type for dictionary registration and lookup.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// No dictionary is registered under this name
    #[error("Dictionary not found: {0}")]
    NotFound(String),

    /// A file-backed dictionary or corpus could not be read
    #[error("Failed to read dictionary file {}: {source}", path.display())]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The builtin catalog has no generator with this name
    #[error("Unknown builtin dictionary: {0}")]
    UnknownBuiltin(String),

    /// A dictionary definition names no source at all
    #[error("Dictionary '{0}' has no items, items_file or builtin")]
    EmptyDefinition(String),
}
