use dtsx_flatten::core::error::{AppError, ErrorReporter};
use dtsx_flatten::core::export::{
    CsvWriter, JsonWriter, OutputFormat, OutputNamer, Table, TabularWriter,
};
use dtsx_flatten::core::orchestrator::{export_document, BatchOrchestrator};
use dtsx_flatten::core::package::extract_rows;
use dtsx_flatten::core::DocumentStatus;
use insta::assert_snapshot;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SALES_LOAD: &str = include_str!("../fixtures/sales_load.dtsx");

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[derive(Clone, Default)]
struct RecordingReporter {
    errors: Arc<Mutex<Vec<String>>>,
}

impl ErrorReporter for RecordingReporter {
    fn report_error(&self, error: &AppError) {
        self.errors
            .lock()
            .unwrap()
            .push(error.document().unwrap_or_default().to_string());
    }

    fn report_warning(&self, _message: &str, _context: Option<String>) {}

    fn report_info(&self, _message: &str) {}

    fn report_debug(&self, _message: &str) {}
}

#[test]
fn csv_output_uses_column_union() {
    let table = Table::from_rows(&extract_rows(SALES_LOAD).unwrap());
    let csv = CsvWriter.render(&table).unwrap();

    assert_snapshot!(csv.trim_end(), @r###"
    ExecutableID,ExecutableType,ExecutableName,Tag,ParentExecutableID,PackageName,ConnectionID,SqlStatementSource,ComponentName,ComponentType,Property_AccessMode,Property_OpenRowset,Property_FastLoadOptions
    Package\Prepare,STOCK:SEQUENCE,Prepare,Executable,,,,,,,,,
    Package\Prepare\Truncate staging,Microsoft.ExecuteSQLTask,Truncate staging,Executable,Package\Prepare,,{7A1B2C3D-0000-4000-8000-000000000001},TRUNCATE TABLE stg.Sales,,,,,
    Package\Load sales,Microsoft.Pipeline,Load sales,Executable,,,,,Source,Microsoft.OLEDBSource,0,[dbo].[Sales],
    Package\Load sales,Microsoft.Pipeline,Load sales,Executable,,,,,Destination,Microsoft.OLEDBDestination,,[stg].[Sales],
    Package\Run child,Microsoft.ExecutePackageTask,Run child,Executable,,Child.dtsx,,,,,,,
    Package\Notify,Custom.Task,Notify,Executable,,,,,,,,,
    "###);
}

#[test]
fn json_output_gives_every_object_every_column() {
    let table = Table::from_rows(&extract_rows(SALES_LOAD).unwrap());
    let value = JsonWriter.to_value(&table);
    let objects = value.as_array().expect("array of rows");

    assert_eq!(objects.len(), 6);
    for object in objects {
        let keys: Vec<&str> = object.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, table.columns(), "keys follow the table column order");
    }
    assert_eq!(objects[3]["ComponentName"], "Destination");
    assert_eq!(objects[3]["Property_AccessMode"], "");
    assert_eq!(objects[4]["PackageName"], "Child.dtsx");
}

#[test]
fn table_without_pipelines_has_only_base_columns() {
    let rows = extract_rows(
        r#"<DTS:Executable xmlns:DTS="www.microsoft.com/SqlServer/Dts">
             <DTS:Executables>
               <DTS:Executable DTS:refId="A" DTS:ExecutableType="Custom.Task"/>
             </DTS:Executables>
           </DTS:Executable>"#,
    )
    .unwrap();
    let table = Table::from_rows(&rows);
    assert_eq!(table.columns().len(), 8);
    assert_eq!(table.cell(0, "ExecutableID"), Some("A"));
    assert_eq!(table.cell(0, "ComponentName"), None);
}

#[test]
fn writers_create_the_output_directory() {
    let temp = TempDir::new().unwrap();
    let table = Table::from_rows(&extract_rows(SALES_LOAD).unwrap());

    let csv_path = temp.path().join("nested/out/sales.csv");
    CsvWriter.write_table(&table, &csv_path).unwrap();
    let written = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(written.lines().count(), 7);

    let json_path = temp.path().join("nested/out/sales.json");
    JsonWriter.write_table(&table, &json_path).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 6);
}

#[test]
fn output_namer_disambiguates_colliding_stems() {
    let mut namer = OutputNamer::new("out", OutputFormat::Csv);
    assert_eq!(namer.next_path("Load"), Path::new("out/Load.csv"));
    assert_eq!(namer.next_path("load"), Path::new("out/load_2.csv"));
    assert_eq!(namer.next_path("Load"), Path::new("out/Load_3.csv"));
    assert_eq!(namer.next_path("Daily load?"), Path::new("out/Daily_load_.csv"));
}

#[test]
fn export_document_writes_nothing_on_failure() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("broken.csv");

    let err = export_document(&fixture("truncated.dtsx"), &output, &CsvWriter).unwrap_err();
    assert_eq!(err.code, "DOCUMENT_XML");
    assert!(!output.exists());
}

#[tokio::test]
async fn batch_isolates_failing_documents() {
    let temp = TempDir::new().unwrap();
    let reporter = RecordingReporter::default();
    let orchestrator = BatchOrchestrator::new(
        Arc::new(CsvWriter),
        Box::new(reporter.clone()),
        temp.path().to_path_buf(),
    );

    let documents = vec![
        fixture("no_namespace.dtsx"),
        fixture("sales_load.dtsx"),
        fixture("truncated.dtsx"),
    ];
    let outcome = orchestrator.run(documents.clone()).await;

    assert_eq!(outcome.summary.documents, 3);
    assert_eq!(outcome.summary.exported, 1);
    assert_eq!(outcome.summary.failed, 2);
    assert_eq!(outcome.summary.rows, 6);

    let reported: Vec<_> = outcome.documents.iter().map(|r| r.document.clone()).collect();
    assert_eq!(reported, documents);
    assert_eq!(outcome.documents[1].status, DocumentStatus::Exported);
    assert_eq!(
        outcome.documents[1].output.as_deref(),
        Some(temp.path().join("sales_load.csv").as_path())
    );
    assert!(outcome.documents[0].error.is_some());
    assert!(!temp.path().join("no_namespace.csv").exists());
    assert!(!temp.path().join("truncated.csv").exists());

    let errors = reporter.errors.lock().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|document| document.ends_with("truncated.dtsx")));
}

#[tokio::test]
async fn empty_batch_reports_nothing() {
    let temp = TempDir::new().unwrap();
    let orchestrator = BatchOrchestrator::new(
        Arc::new(JsonWriter),
        Box::new(RecordingReporter::default()),
        temp.path().to_path_buf(),
    );
    let outcome = orchestrator.run(Vec::new()).await;
    assert!(outcome.documents.is_empty());
    assert!(!outcome.summary.has_failures());
}
