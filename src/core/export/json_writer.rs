use crate::core::error::AppError;
use crate::core::export::{export_error, OutputFormat, Table, TabularWriter};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Writes a table as a JSON array of objects, every object carrying every column.
pub struct JsonWriter;

impl JsonWriter {
    pub fn to_value(&self, table: &Table) -> Value {
        let objects = table
            .records()
            .iter()
            .map(|record| {
                let object: Map<String, Value> = table
                    .columns()
                    .iter()
                    .zip(record)
                    .map(|(column, cell)| (column.clone(), Value::String(cell.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(objects)
    }
}

impl TabularWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_table(&self, table: &Table, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| export_error(path, err))?;
        }
        let json = serde_json::to_string_pretty(&self.to_value(table))
            .map_err(|err| export_error(path, err))?;
        fs::write(path, json).map_err(|err| export_error(path, err))
    }
}
