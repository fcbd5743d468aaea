//! Unified error types for the phonemizer.

use std::path::PathBuf;

/// Main error type for phonemizer operations.
#[derive(Debug, thiserror::Error)]
pub enum PhonemizerError {
    /// A dictionary file exists but could not be read.
    #[error("dictionary load failed for {path}: {source}")]
    DictionaryLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dictionary document is malformed.
    #[error("malformed dictionary {origin}: {reason}")]
    DictionaryParse { origin: String, reason: String },

    /// Model asset loading error.
    #[error("model load failed for {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model inference error.
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No language record registered under the given id.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results with PhonemizerError.
pub type PhonemizerResult<T> = Result<T, PhonemizerError>;

impl PhonemizerError {
    /// Create a dictionary parse error.
    pub fn dictionary_parse(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DictionaryParse {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create an inference error with message.
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a config error with message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error with message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a serialization error with message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an internal error with message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from loading a dictionary or model asset.
    ///
    /// Load errors drop the affected layer; they never abort phonemization.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::DictionaryLoad { .. } | Self::DictionaryParse { .. } | Self::ModelLoad { .. }
        )
    }
}
