//! Error types for the docoracle-rs library.
//!
//! Errors are split by how they propagate: construction and configuration
//! errors surface immediately, per-candidate lookup failures are absorbed by
//! the matcher, and embedding initialization failures abort the run.

use std::io;

use thiserror::Error;

/// Main result type for docoracle operations.
pub type Result<T> = std::result::Result<T, DocOracleError>;

/// Error type for all docoracle operations.
#[derive(Error, Debug)]
pub enum DocOracleError {
    /// I/O related errors (file operations)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Invalid input data, such as a malformed method name
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// A single word-vector or distance lookup failed
    #[error("Embedding lookup failed: {message}")]
    Embedding {
        /// Error description
        message: String,
        /// Word that could not be resolved, if known
        word: Option<String>,
    },

    /// The embedding resource could not be loaded
    #[error("Embedding initialization failed: {message}")]
    EmbeddingInit {
        /// Error description
        message: String,
    },

    /// Lemmatization service errors
    #[error("Lemmatizer error: {message}")]
    Lemmatizer {
        /// Error description
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A run exceeded its configured time budget
    #[error("Run timed out after {seconds} seconds")]
    Timeout {
        /// Budget that was exceeded
        seconds: u64,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl DocOracleError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new embedding lookup error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            word: None,
        }
    }

    /// Create an out-of-vocabulary error for `word`
    pub fn out_of_vocabulary(word: impl Into<String>) -> Self {
        let word = word.into();
        Self::Embedding {
            message: format!("'{word}' is not in the vector vocabulary"),
            word: Some(word),
        }
    }

    /// Create a new embedding initialization error
    pub fn embedding_init(message: impl Into<String>) -> Self {
        Self::EmbeddingInit {
            message: message.into(),
        }
    }

    /// Create a new lemmatizer error
    pub fn lemmatizer(message: impl Into<String>) -> Self {
        Self::Lemmatizer {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Whether this error must abort the whole run rather than a single lookup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EmbeddingInit { .. } | Self::Timeout { .. })
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        if let Self::Internal { context: ctx, .. } = &mut self {
            *ctx = Some(context.into());
        }
        self
    }
}

impl From<io::Error> for DocOracleError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for DocOracleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for DocOracleError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DocOracleError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}
