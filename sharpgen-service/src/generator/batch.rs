//! Batch export of generated classes to disk
//!
//! Iterates the tables flagged for export, generates the class body for each
//! (no SQL query, no EF key in batch mode) and writes it to a uniquely-named
//! file in the output directory. Progress is reported per table through an
//! unbounded channel; cancellation is cooperative and checked once per
//! table, before processing. Files written before a cancellation remain on
//! disk.

use super::csharp::CSharpClassGenerator;
use super::options::ClassGenOptions;
use super::sanitize::class_name_from_table;
use super::traits::{ExportProgress, ExportSummary, GeneratorError, GeneratorResult};
use sharpgen_core::traits::TableEnricher;
use sharpgen_core::types::TableDefinition;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Batch exporter writing one `.cs` file per exported table
pub struct BatchExporter {
    generator: CSharpClassGenerator,
}

impl BatchExporter {
    /// Create an exporter around the given generator
    #[must_use]
    pub fn new(generator: CSharpClassGenerator) -> Self {
        Self { generator }
    }

    /// The generator backing this exporter
    #[must_use]
    pub fn generator(&self) -> &CSharpClassGenerator {
        &self.generator
    }

    /// Export every table flagged for export, in caller order.
    ///
    /// The output directory is taken from the options and is optionally
    /// emptied first. Tables without loaded columns are enriched on the fly
    /// when an enricher is supplied, and skipped with a warning otherwise.
    ///
    /// # Errors
    /// Returns an error when the options carry no output directory, when the
    /// directory cannot be created or emptied, when enrichment fails, or
    /// when a file cannot be written. File-system errors are not caught
    /// here; user-facing reporting is the caller's concern.
    pub async fn export(
        &self,
        options: &ClassGenOptions,
        tables: &mut [TableDefinition],
        enricher: Option<&dyn TableEnricher>,
        progress: Option<&UnboundedSender<ExportProgress>>,
        cancel: &CancellationToken,
    ) -> GeneratorResult<ExportSummary> {
        let output_dir = options.output_dir().ok_or_else(|| {
            GeneratorError::Generation("batch export requires an output directory".to_string())
        })?;

        if options.empty_dir_first() && tokio::fs::try_exists(output_dir).await? {
            tokio::fs::remove_dir_all(output_dir).await?;
        }
        tokio::fs::create_dir_all(output_dir).await?;

        // The template and type table caches read from disk on first use;
        // fill them off the async workers before entering the loop.
        let templates = Arc::clone(self.generator.templates());
        let types = Arc::clone(self.generator.types());
        tokio::task::spawn_blocking(move || {
            templates.warm();
            types.warm();
        })
        .await
        .map_err(|err| GeneratorError::Generation(format!("cache warm-up failed: {err}")))?;

        let total = tables.iter().filter(|t| t.export).count();
        info!(total, dir = %output_dir.display(), "starting batch export");

        let mut summary = ExportSummary::default();
        let mut current = 0usize;

        for table in tables.iter_mut().filter(|t| t.export) {
            if cancel.is_cancelled() {
                Self::report(
                    progress,
                    current,
                    total,
                    "Cancellation requested. Stopping the export.".to_string(),
                );
                info!(exported = current, total, "batch export cancelled");
                summary.cancelled = true;
                break;
            }
            current += 1;

            if !table.is_enriched() {
                match enricher {
                    Some(enricher) => {
                        let columns = enricher.load_columns(table).await?;
                        table.set_columns(columns);
                    }
                    None => {
                        warn!(table = %table.name, "table has no columns loaded, skipping");
                        Self::report(
                            progress,
                            current,
                            total,
                            format!("{current} of {total}: skipped '{}', no columns loaded", table.name),
                        );
                        continue;
                    }
                }
            }

            let class_name = table
                .alias
                .as_deref()
                .filter(|alias| !alias.trim().is_empty())
                .map_or_else(|| class_name_from_table(&table.name), ToString::to_string);

            let table_options = options.for_class(class_name.as_str());
            let result = self
                .generator
                .generate_inner(&table_options, table, false, false, "")?;

            let path = Self::unique_path(output_dir, &class_name).await?;
            tokio::fs::write(&path, &result.code).await?;

            Self::report(
                progress,
                current,
                total,
                format!(
                    "{current} of {total}: exported '{}' to '{}'",
                    table.name,
                    path.display()
                ),
            );
            summary.written.push(path);
        }

        Ok(summary)
    }

    /// First non-existing path of the form `Name.cs`, `Name_1.cs`, ...
    async fn unique_path(dir: &Path, class_name: &str) -> GeneratorResult<PathBuf> {
        let mut path = dir.join(format!("{class_name}.cs"));
        let mut suffix = 0usize;
        while tokio::fs::try_exists(&path).await? {
            suffix += 1;
            path = dir.join(format!("{class_name}_{suffix}.cs"));
        }
        Ok(path)
    }

    fn report(
        progress: Option<&UnboundedSender<ExportProgress>>,
        current: usize,
        total: usize,
        message: String,
    ) {
        if let Some(sender) = progress {
            // A closed receiver only means nobody is watching
            let _ = sender.send(ExportProgress {
                current,
                total,
                message,
            });
        }
    }
}
