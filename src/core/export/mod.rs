//! Tabular export of flattened rows, one output file per source document.

pub mod csv_writer;
pub mod json_writer;
pub mod table;

pub use csv_writer::CsvWriter;
pub use json_writer::JsonWriter;
pub use table::Table;

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    pub fn writer(self) -> Box<dyn TabularWriter + Send + Sync> {
        match self {
            OutputFormat::Csv => Box::new(CsvWriter),
            OutputFormat::Json => Box::new(JsonWriter),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "invalid output format '{}'; supported values are csv, json",
                value
            )),
        }
    }
}

/// Persists one table for one source document.
pub trait TabularWriter {
    fn format(&self) -> OutputFormat;
    fn write_table(&self, table: &Table, path: &Path) -> Result<(), AppError>;
}

/// Hands out collision-free output paths inside an output directory.
pub struct OutputNamer {
    directory: PathBuf,
    extension: &'static str,
    used: HashSet<String>,
}

impl OutputNamer {
    pub fn new(directory: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            directory: directory.into(),
            extension: format.extension(),
            used: HashSet::new(),
        }
    }

    /// Reserve a path for a document identified by `stem`.
    pub fn next_path(&mut self, stem: &str) -> PathBuf {
        let base = sanitize_stem(stem);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while !self.used.insert(candidate.to_lowercase()) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.directory
            .join(format!("{}.{}", candidate, self.extension))
    }
}

fn sanitize_stem(stem: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let pattern = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]+").expect("valid regex"));
    let cleaned = pattern.replace_all(stem.trim(), "_");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "package".to_string()
    } else {
        cleaned.to_string()
    }
}

pub(crate) fn export_error(path: &Path, err: impl fmt::Display) -> AppError {
    AppError::new(
        ErrorCategory::ExportError,
        format!("failed to write {}: {}", path.display(), err),
    )
}
