use crate::query::models::Field;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid export JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Converts a tax records export (a JSON array of objects keyed by the
/// Finnish column headers) into CSV with one column per known field.
pub fn convert_file(input: &Path, output: &Path) -> Result<usize, ConvertError> {
    info!("Converting {} to {}", input.display(), output.display());

    let raw = fs::read_to_string(input)?;
    let records: Vec<Map<String, Value>> = serde_json::from_str(&raw)?;

    let file = fs::File::create(output)?;
    let written = write_csv(&records, file)?;

    info!("Wrote {} records to {}", written, output.display());
    Ok(written)
}

pub fn write_csv<W: Write>(records: &[Map<String, Value>], out: W) -> Result<usize, ConvertError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(Field::ALL.iter().map(|f| f.key()))?;

    for record in records {
        let mut cells = vec![String::new(); Field::ALL.len()];
        for (header, value) in record {
            match Field::from_source_header(header) {
                Some(field) => {
                    let index = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
                    cells[index] = cell_text(value);
                }
                None => debug!("Skipping unknown export column '{}'", header),
            }
        }
        writer.write_record(&cells)?;
    }

    writer.flush()?;
    Ok(records.len())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
