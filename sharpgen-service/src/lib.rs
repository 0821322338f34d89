//! # `sharpgen` Service
//!
//! Generates C# classes from SQL Server table metadata: identifier
//! sanitization, SQL to C# type mapping, template-driven class emission with
//! optional EF data annotations, composite-key snippets, SQL SELECT
//! reconstruction, ad-hoc query reverse engineering, and batch file export
//! with progress reporting and cooperative cancellation.
//!
//! The database itself is reached only through the collaborator traits of
//! [`sharpgen_core`]; this crate never opens a connection.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod generator;

pub use generator::{
    BatchExporter, CSharpClassGenerator, ClassGenOptions, ClassGenResult, ExportProgress,
    ExportSummary, GeneratorError, GeneratorResult, ModelKind, TemplateStore, TypeConversionTable,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::generator::{
        AccessModifier, BatchExporter, CSharpClassGenerator, ClassGenOptions, ClassGenResult,
        ExportProgress, ExportSummary, GeneratorError, GeneratorResult, ModelKind, TemplateStore,
        TypeConversionTable,
    };
    pub use sharpgen_core::prelude::*;
}
