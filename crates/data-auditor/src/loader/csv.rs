//! CSV reading with polars' native type detection.
//!
//! Columns with no value at all are read as all-null `Float64`, the same
//! dtype the Excel loader gives them, so an empty column means the same
//! thing to the detector whichever format it arrived in.

use crate::error::{AuditError, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Parse CSV bytes, retrying once on a cleaned copy of the content.
pub(crate) fn read_csv(bytes: Vec<u8>) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AuditError::EmptyOrMalformedTable(
            "file is empty".to_string(),
        ));
    }

    // Strategy 1: standard loading with quote handling
    let first_error = match parse(Cursor::new(bytes.as_slice())) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard CSV loading failed: {}", e);
            e
        }
    };

    // Strategy 2: pre-clean content
    let content = String::from_utf8_lossy(&bytes);
    let cleaned = clean_csv_content(&content);
    parse(Cursor::new(cleaned.as_bytes())).map_err(|e| {
        debug!("Loading cleaned CSV failed: {}", e);
        AuditError::EmptyOrMalformedTable(first_error.to_string())
    })
}

fn parse(cursor: Cursor<&[u8]>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .into_reader_with_file_handle(cursor)
        .finish()
        .and_then(empty_columns_as_float)
}

/// Cast columns without a single value to `Float64`.
fn empty_columns_as_float(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let height = df.height();
    let empty: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|col| {
            col.null_count() == height && matches!(col.dtype(), DataType::String | DataType::Null)
        })
        .map(|col| col.name().clone())
        .collect();

    for name in empty {
        debug!("Column '{}' has no values, reading it as Float64", name);
        let cast = df.column(name.as_str())?.cast(&DataType::Float64)?;
        df.with_column(cast)?;
    }
    Ok(df)
}

/// Drop blank lines and collapse doubled quotes.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
