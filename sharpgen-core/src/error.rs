//! Error types for `sharpgen` operations

use thiserror::Error;

/// Main error type for `sharpgen` operations
#[derive(Error, Debug)]
pub enum SharpGenError {
    /// Code generation errors
    #[error("Code generation failed: {message}")]
    GenerationError {
        /// Error message
        message: String,
        /// Table being processed if available
        table: Option<String>,
    },

    /// Template loading or rendering errors
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Type conversion table errors
    #[error("Type conversion error: {0}")]
    TypeConversionError(String),

    /// Errors raised by the table enrichment collaborator
    #[error("Failed to enrich table '{table}': {reason}")]
    EnrichmentError {
        /// Table that failed
        table: String,
        /// Reason for failure
        reason: String,
    },

    /// Errors raised by the ad-hoc query collaborator
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for `sharpgen` operations
pub type Result<T> = std::result::Result<T, SharpGenError>;

impl SharpGenError {
    /// Create a new generation error
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationError {
            message: message.into(),
            table: None,
        }
    }

    /// Create a new generation error for a specific table
    #[must_use]
    pub fn generation_for(message: impl Into<String>, table: impl Into<String>) -> Self {
        Self::GenerationError {
            message: message.into(),
            table: Some(table.into()),
        }
    }

    /// Create a new template error
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::TemplateError(message.into())
    }

    /// Create a new type conversion error
    #[must_use]
    pub fn type_conversion(message: impl Into<String>) -> Self {
        Self::TypeConversionError(message.into())
    }

    /// Create a new enrichment error
    #[must_use]
    pub fn enrichment(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnrichmentError {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a new query error
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError(message.into())
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError(message.into())
    }

    /// Create a generic error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generic error with source
    #[must_use]
    pub fn other_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Implement conversions for common error types
impl From<serde_json::Error> for SharpGenError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
