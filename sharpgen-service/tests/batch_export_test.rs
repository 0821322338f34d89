//! Tests for the batch exporter

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sharpgen_core::error::Result;
use sharpgen_core::traits::TableEnricher;
use sharpgen_core::types::{ColumnDefinition, TableDefinition};
use sharpgen_service::generator::{
    BatchExporter, CSharpClassGenerator, ClassGenOptions, ExportProgress, TemplateStore,
    TypeConversionTable,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn exporter() -> BatchExporter {
    BatchExporter::new(CSharpClassGenerator::new(
        Arc::new(TemplateStore::new()),
        Arc::new(TypeConversionTable::new()),
    ))
}

fn enriched_table(name: &str) -> TableDefinition {
    let mut table = TableDefinition::new(name, "dbo");
    table.set_columns(vec![
        ColumnDefinition::new("Id", "int", 1).with_primary_key(true),
        ColumnDefinition::new("Name", "nvarchar", 2).with_nullable(true),
    ]);
    table
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ExportProgress>) -> Vec<ExportProgress> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn exports_one_file_per_table_with_progress() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .build();
    let mut tables = vec![enriched_table("Person"), enriched_table("order_line")];

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let summary = exporter()
        .export(&options, &mut tables, None, Some(&tx), &CancellationToken::new())
        .await
        .expect("export succeeds");

    assert!(!summary.cancelled);
    assert_eq!(summary.written.len(), 2);
    assert!(dir.path().join("Person.cs").is_file());
    assert!(dir.path().join("OrderLine.cs").is_file());

    let content = std::fs::read_to_string(dir.path().join("Person.cs")).expect("read file");
    assert!(content.contains("public class Person"));
    // Batch mode writes the class body only
    assert!(!content.contains("SELECT"));
    assert!(!content.contains("HasKey"));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].current, 1);
    assert_eq!(events[0].total, 2);
    assert!(events[0].message.contains("Person"));
    assert_eq!(events[1].current, 2);
}

#[tokio::test]
async fn colliding_class_names_get_numeric_suffixes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .build();
    // Both names sanitize to "UserData"
    let mut tables = vec![enriched_table("user_data"), enriched_table("UserData")];

    let summary = exporter()
        .export(&options, &mut tables, None, None, &CancellationToken::new())
        .await
        .expect("export succeeds");

    assert_eq!(summary.written.len(), 2);
    assert!(dir.path().join("UserData.cs").is_file());
    assert!(dir.path().join("UserData_1.cs").is_file());
}

#[tokio::test]
async fn table_alias_overrides_the_sanitized_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .build();
    let mut table = enriched_table("tbl_customer_v2");
    table.alias = Some("Customer".to_string());
    let mut tables = vec![table];

    exporter()
        .export(&options, &mut tables, None, None, &CancellationToken::new())
        .await
        .expect("export succeeds");

    assert!(dir.path().join("Customer.cs").is_file());
    let content = std::fs::read_to_string(dir.path().join("Customer.cs")).expect("read file");
    assert!(content.contains("public class Customer"));
}

#[tokio::test]
async fn empty_dir_first_clears_previous_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("stale.cs"), "// stale").expect("write stale file");

    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .empty_dir_first(true)
        .build();
    let mut tables = vec![enriched_table("Person")];

    exporter()
        .export(&options, &mut tables, None, None, &CancellationToken::new())
        .await
        .expect("export succeeds");

    assert!(!dir.path().join("stale.cs").exists());
    assert!(dir.path().join("Person.cs").is_file());
}

#[tokio::test]
async fn tables_not_flagged_for_export_are_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .build();
    let mut skipped = enriched_table("Internal");
    skipped.export = false;
    let mut tables = vec![enriched_table("Person"), skipped];

    let summary = exporter()
        .export(&options, &mut tables, None, None, &CancellationToken::new())
        .await
        .expect("export succeeds");

    assert_eq!(summary.written.len(), 1);
    assert!(!dir.path().join("Internal.cs").exists());
}

/// Enricher that cancels the token after serving its first table, so the
/// export stops between the first and second item
struct CancellingEnricher {
    calls: AtomicUsize,
    token: CancellationToken,
}

#[async_trait]
impl TableEnricher for CancellingEnricher {
    async fn load_columns(&self, _table: &TableDefinition) -> Result<Vec<ColumnDefinition>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.token.cancel();
        }
        Ok(vec![ColumnDefinition::new("Id", "int", 1)])
    }
}

#[tokio::test]
async fn cancellation_is_honored_between_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .build();
    let mut tables = vec![
        TableDefinition::new("First", "dbo"),
        TableDefinition::new("Second", "dbo"),
        TableDefinition::new("Third", "dbo"),
    ];

    let token = CancellationToken::new();
    let enricher = CancellingEnricher {
        calls: AtomicUsize::new(0),
        token: token.clone(),
    };

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let summary = exporter()
        .export(&options, &mut tables, Some(&enricher), Some(&tx), &token)
        .await
        .expect("export succeeds");

    assert!(summary.cancelled);
    assert_eq!(summary.written.len(), 1);

    // Exactly the first file exists; the written one is not rolled back
    let files: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(std::result::Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["First.cs".to_string()]);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(events[0].message.contains("First"));
    assert!(events[1].message.contains("Cancellation requested"));
}

#[tokio::test]
async fn lazy_enrichment_loads_missing_columns() {
    struct StaticEnricher;

    #[async_trait]
    impl TableEnricher for StaticEnricher {
        async fn load_columns(&self, _table: &TableDefinition) -> Result<Vec<ColumnDefinition>> {
            Ok(vec![ColumnDefinition::new("Id", "int", 1)])
        }
    }

    let dir = tempfile::tempdir().expect("temp dir");
    let options = ClassGenOptions::builder("Class")
        .output_dir(dir.path())
        .build();
    let mut tables = vec![TableDefinition::new("Person", "dbo")];

    exporter()
        .export(&options, &mut tables, Some(&StaticEnricher), None, &CancellationToken::new())
        .await
        .expect("export succeeds");

    assert!(tables[0].is_enriched());
    let content = std::fs::read_to_string(dir.path().join("Person.cs")).expect("read file");
    assert!(content.contains("public int Id { get; set; }"));
}

#[tokio::test]
async fn missing_output_directory_is_an_error() {
    let options = ClassGenOptions::builder("Class").build();
    let mut tables = vec![enriched_table("Person")];

    let err = exporter()
        .export(&options, &mut tables, None, None, &CancellationToken::new())
        .await
        .expect_err("export without output directory must fail");
    assert!(err.to_string().contains("output directory"));
}
