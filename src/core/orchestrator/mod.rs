use crate::core::error::{AppError, ErrorReporter};
use crate::core::export::{OutputNamer, Table, TabularWriter};
use crate::core::package::PackageDocument;
use crate::core::types::{BatchSummary, DocumentStatus, ErrorCategory};
use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Result of processing one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub document: PathBuf,
    pub status: DocumentStatus,
    pub rows: usize,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

/// Reports for every document, in discovery order, plus the aggregate summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub documents: Vec<DocumentReport>,
    pub summary: BatchSummary,
}

/// Drives extraction and export for a batch of documents.
///
/// Each document is extracted and written on the blocking pool; documents share nothing, so a
/// failure affects only the document it came from.
pub struct BatchOrchestrator {
    writer: Arc<dyn TabularWriter + Send + Sync>,
    reporter: Box<dyn ErrorReporter + Send + Sync>,
    output_dir: PathBuf,
}

impl BatchOrchestrator {
    pub fn new(
        writer: Arc<dyn TabularWriter + Send + Sync>,
        reporter: Box<dyn ErrorReporter + Send + Sync>,
        output_dir: PathBuf,
    ) -> Self {
        BatchOrchestrator {
            writer,
            reporter,
            output_dir,
        }
    }

    pub async fn run(&self, documents: Vec<PathBuf>) -> BatchOutcome {
        let started = Instant::now();
        self.reporter.report_info(&format!(
            "Flattening {} document(s) into {} ({})",
            documents.len(),
            self.output_dir.display(),
            self.writer.format()
        ));

        let mut namer = OutputNamer::new(&self.output_dir, self.writer.format());
        let tasks = documents.into_iter().map(|document| {
            let stem = document
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = namer.next_path(&stem);
            let writer = Arc::clone(&self.writer);
            let path = document.clone();
            let handle =
                tokio::task::spawn_blocking(move || export_document(&path, &output, &*writer));
            async move { (document, handle.await) }
        });
        // Output paths are reserved eagerly so naming follows discovery order.
        let tasks: Vec<_> = tasks.collect();

        let mut summary = BatchSummary::default();
        let mut reports = Vec::new();
        for (document, joined) in join_all(tasks).await {
            let result = joined.unwrap_or_else(|err| {
                Err(AppError::new(
                    ErrorCategory::InternalError,
                    format!("extraction task for {} panicked: {}", document.display(), err),
                ))
            });
            let report = match result {
                Ok((rows, output)) => {
                    tracing::info!(
                        document = %document.display(),
                        rows,
                        output = %output.display(),
                        "exported package"
                    );
                    DocumentReport {
                        document,
                        status: DocumentStatus::Exported,
                        rows,
                        output: Some(output),
                        error: None,
                    }
                }
                Err(mut error) => {
                    if error.document().is_none() {
                        error.add_context("document", &document.display().to_string());
                    }
                    self.reporter.report_error(&error);
                    DocumentReport {
                        document,
                        status: DocumentStatus::Failed,
                        rows: 0,
                        output: None,
                        error: Some(error.message.clone()),
                    }
                }
            };
            summary.record(report.status, report.rows);
            reports.push(report);
        }

        self.reporter.report_info(&format!(
            "Processed {} document(s): {} exported, {} failed, {} row(s) in {:.2?}",
            summary.documents,
            summary.exported,
            summary.failed,
            summary.rows,
            started.elapsed()
        ));

        BatchOutcome {
            documents: reports,
            summary,
        }
    }
}

/// Extract, flatten, and write one document. Nothing is written when extraction fails.
pub fn export_document(
    document: &Path,
    output: &Path,
    writer: &dyn TabularWriter,
) -> Result<(usize, PathBuf), AppError> {
    let package = PackageDocument::load(document)?;
    let table = Table::from_rows(&package.rows());
    writer.write_table(&table, output)?;
    Ok((table.len(), output.to_path_buf()))
}
