//! # `sharpgen` Core
//!
//! Core types and traits for generating C# classes from SQL Server table
//! metadata.
//!
//! This crate provides the building blocks shared by the generator service:
//! table/column metadata types, error handling, configuration, and the
//! collaborator traits through which the database is reached. The crate
//! itself never talks to a database.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Core error types for generator operations
pub mod error;

/// Collaborator traits for table enrichment and ad-hoc queries
pub mod traits;

/// Table and column metadata types
pub mod types;

/// Configuration types for the generator service
pub mod config;

// Re-export commonly used types
pub use config::SharpGenConfig;
pub use error::{Result, SharpGenError};
pub use traits::{QueryExecutor, TableEnricher};
pub use types::{ColumnDefinition, QueryColumn, TableDefinition, TableKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::SharpGenConfig;
    pub use crate::error::{Result, SharpGenError};
    pub use crate::traits::{QueryExecutor, TableEnricher};
    pub use crate::types::{ColumnDefinition, QueryColumn, TableDefinition, TableKind};
}
