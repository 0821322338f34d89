//! C# class generation from SQL Server table metadata
//!
//! The pipeline: identifier sanitization, SQL to C# type conversion,
//! structured template substitution, class/key/query emission, and batch
//! file export.

pub mod batch;
pub mod csharp;
pub mod options;
pub mod sanitize;
pub mod template;
pub mod traits;
pub mod type_map;

// Re-export main types
pub use batch::BatchExporter;
pub use csharp::CSharpClassGenerator;
pub use options::{AccessModifier, ClassGenOptions, ClassGenOptionsBuilder, ModelKind};
pub use template::{ClassTemplateKey, PropertyTemplateKey, Substitutions, Template, TemplateStore, Token};
pub use traits::{ClassGenResult, ExportProgress, ExportSummary, GeneratorError, GeneratorResult};
pub use type_map::{TypeConversionTable, TypeMapping};
