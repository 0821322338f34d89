//! Command line front end for the class generator
//!
//! Reads table metadata from a JSON file (the shape of
//! [`TableDefinition`]) and writes one generated `.cs` file per exported
//! table. Ctrl-C requests cooperative cancellation; files already written
//! stay on disk.

use anyhow::{Context, Result};
use clap::Parser;
use sharpgen_core::config::SharpGenConfig;
use sharpgen_core::types::TableDefinition;
use sharpgen_service::generator::{
    AccessModifier, BatchExporter, CSharpClassGenerator, ClassGenOptions, ExportProgress,
    ModelKind, TemplateStore, TypeConversionTable,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sharpgen", about = "Generate C# classes from SQL Server table metadata")]
struct Cli {
    /// JSON file with the table definitions to export
    #[arg(long)]
    tables: PathBuf,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory; overrides the configured default
    #[arg(long)]
    output: Option<PathBuf>,

    /// Namespace for the generated classes
    #[arg(long)]
    namespace: Option<String>,

    /// Use `internal` instead of `public`
    #[arg(long)]
    internal: bool,

    /// Mark the generated classes `sealed`
    #[arg(long)]
    sealed: bool,

    /// Nullable-aware output for reference types
    #[arg(long)]
    nullable: bool,

    /// Add summary comments
    #[arg(long)]
    summary: bool,

    /// Mention the table name in the class summary (implies --summary)
    #[arg(long)]
    table_name_in_summary: bool,

    /// Generate EF model classes with data annotations
    #[arg(long)]
    ef: bool,

    /// Add an explicit [Column] attribute to every property (implies --ef)
    #[arg(long)]
    column_attributes: bool,

    /// Empty the output directory before exporting
    #[arg(long)]
    empty_dir: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let tables_text = std::fs::read_to_string(&cli.tables)
        .with_context(|| format!("reading table metadata from '{}'", cli.tables.display()))?;
    let mut tables: Vec<TableDefinition> =
        serde_json::from_str(&tables_text).context("parsing table metadata")?;

    let kind = if cli.column_attributes {
        ModelKind::EfModelWithColumnAttributes
    } else if cli.ef {
        ModelKind::EfModel
    } else {
        ModelKind::Plain
    };

    // The class name is derived per table by the exporter
    let mut builder = ClassGenOptions::builder("Class")
        .modifier(if cli.internal {
            AccessModifier::Internal
        } else {
            AccessModifier::Public
        })
        .sealed(cli.sealed)
        .nullable(cli.nullable)
        .summary(cli.summary)
        .table_name_in_summary(cli.table_name_in_summary)
        .kind(kind)
        .output_dir(cli.output.unwrap_or(config.export.output_dir))
        .empty_dir_first(cli.empty_dir || config.export.empty_dir_first);
    if let Some(namespace) = cli.namespace {
        builder = builder.namespace(namespace);
    }
    let options = builder.build();

    let templates = match &config.templates.dir {
        Some(dir) => Arc::new(TemplateStore::with_dir(dir)),
        None => Arc::new(TemplateStore::new()),
    };
    let types = match &config.type_conversion.file {
        Some(file) => Arc::new(TypeConversionTable::with_file(file)),
        None => Arc::new(TypeConversionTable::new()),
    };
    let exporter = BatchExporter::new(CSharpClassGenerator::new(templates, types));

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("cancellation requested");
            signal_token.cancel();
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<ExportProgress>();
    let reporter = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            info!("{}", event.message);
        }
    });

    let summary = exporter
        .export(&options, &mut tables, None, Some(&progress_tx), &cancel)
        .await;
    drop(progress_tx);
    let _ = reporter.await;

    match summary {
        Ok(summary) => {
            info!(
                files = summary.written.len(),
                cancelled = summary.cancelled,
                "export finished"
            );
            Ok(())
        }
        Err(err) => {
            error!(%err, "export failed");
            Err(err.into())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<SharpGenConfig> {
    let Some(path) = path else {
        return Ok(SharpGenConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration from '{}'", path.display()))?;
    toml::from_str(&text).context("parsing configuration")
}
