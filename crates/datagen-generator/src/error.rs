//! Error type for generator construction and generation.

use datagen_dictionary::DictionaryError;

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration
    Config,
    /// A dictionary, file or builtin could not be resolved
    Resource,
    /// Generation produced a value the declared type cannot hold
    Logic,
}

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Invalid field configuration
    #[error("Invalid config for field '{field}': {message}")]
    Config {
        /// Offending field
        field: String,
        /// What is wrong
        message: String,
    },

    /// Dictionary or file error
    #[error("Resource error: {0}")]
    Resource(#[from] DictionaryError),

    /// Internal conversion failure during generation
    #[error("Generation failed for field '{field}': {message}")]
    Logic {
        /// Offending field
        field: String,
        /// What went wrong
        message: String,
    },
}

impl GeneratorError {
    /// Configuration error for `field`.
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Logic error for `field`.
    pub fn logic(field: &str, message: impl Into<String>) -> Self {
        Self::Logic {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::Resource(_) => ErrorKind::Resource,
            Self::Logic { .. } => ErrorKind::Logic,
        }
    }
}
