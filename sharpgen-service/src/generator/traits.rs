//! Generator result and error types

use sharpgen_core::error::SharpGenError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for generator operations
pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur during code generation
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Code generation error
    #[error("Code generation failed: {0}")]
    Generation(String),

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core crate (enrichment, queries, configuration)
    #[error(transparent)]
    Core(#[from] SharpGenError),
}

/// Output of a single generation call. Optional parts are empty strings when
/// not produced (table types, batch mode, missing primary key).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassGenResult {
    /// Generated class source text
    pub code: String,

    /// EF composite-key snippet wrapped in a model builder body
    pub ef_key_code: String,

    /// EF composite-key snippet, short form
    pub ef_key_code_short: String,

    /// SQL SELECT statement reconstructing the same projection
    pub sql_query: String,

    /// Diagnostic text for the caller (e.g. duplicate-column warning)
    pub info_text: String,

    /// Whether two output properties resolved to the same identifier.
    /// Advisory; the code was still generated.
    pub has_duplicate_names: bool,
}

/// Progress event raised by the batch exporter, one per processed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProgress {
    /// 1-based counter of the table being processed
    pub current: usize,

    /// Total number of tables flagged for export
    pub total: usize,

    /// Free-text status line for a progress dialog or log
    pub message: String,
}

/// Outcome of a batch export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Files written, in export order. Files written before a cancellation
    /// remain on disk.
    pub written: Vec<PathBuf>,

    /// Whether the export stopped on a cancellation request
    pub cancelled: bool,
}
