//! Delimited-text row source.
//!
//! The host fetches the file; this turns the text into rows keyed by the
//! header line.

use csv::{ReaderBuilder, Trim};

use super::position::Row;
use crate::error::{ChartError, Result};

/// Parse comma-separated text with a header line into rows.
///
/// Blank and whitespace-only lines are skipped. Rows shorter than the header
/// lack the trailing fields; extra trailing values are ignored.
pub fn parse_csv(text: &str) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ChartError::DataFormat {
            row: 0,
            message: format!("unreadable header line: {e}"),
        })?
        .clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ChartError::DataFormat {
            row: index,
            message: e.to_string(),
        })?;

        // A whitespace-only line trims down to a single empty field
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "parsed csv");
    Ok(rows)
}
