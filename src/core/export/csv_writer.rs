use crate::core::error::AppError;
use crate::core::export::{export_error, OutputFormat, Table, TabularWriter};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes a table as RFC 4180 CSV with a header row.
pub struct CsvWriter;

impl CsvWriter {
    pub fn write_to<W: Write>(&self, table: &Table, sink: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new().from_writer(sink);
        writer.write_record(table.columns())?;
        for record in table.records() {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render the table to an in-memory CSV string.
    pub fn render(&self, table: &Table) -> Result<String, AppError> {
        let mut buffer = Vec::new();
        self.write_to(table, &mut buffer)
            .map_err(|err| export_error(Path::new("<memory>"), err))?;
        String::from_utf8(buffer).map_err(|err| export_error(Path::new("<memory>"), err))
    }
}

impl TabularWriter for CsvWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_table(&self, table: &Table, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| export_error(path, err))?;
        }
        let file = fs::File::create(path).map_err(|err| export_error(path, err))?;
        self.write_to(table, file)
            .map_err(|err| export_error(path, err))
    }
}
