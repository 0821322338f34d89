//! Configuration types for the generator service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the generator service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpGenConfig {
    /// Template loading configuration
    pub templates: TemplateConfig,

    /// Type conversion table configuration
    pub type_conversion: TypeConversionConfig,

    /// Batch export configuration
    pub export: ExportConfig,
}

/// Template loading configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding user-edited template overrides. When unset, the
    /// built-in templates are used.
    pub dir: Option<PathBuf>,
}

/// Type conversion table configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeConversionConfig {
    /// Path of the JSON side-car file with user-edited type mappings. When
    /// unset, the built-in mapping table is used.
    pub file: Option<PathBuf>,
}

/// Batch export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory for generated class files
    pub output_dir: PathBuf,

    /// Delete and recreate the output directory before exporting
    pub empty_dir_first: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            empty_dir_first: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SharpGenConfig::default();
        assert!(config.templates.dir.is_none());
        assert!(config.type_conversion.file.is_none());
        assert_eq!(config.export.output_dir, PathBuf::from("generated"));
        assert!(!config.export.empty_dir_first);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let json = r#"{ "export": { "empty_dir_first": true } }"#;
        let config: SharpGenConfig = serde_json::from_str(json).expect("valid config");
        assert!(config.export.empty_dir_first);
        assert_eq!(config.export.output_dir, PathBuf::from("generated"));
    }
}
