//! Excel reading through calamine.
//!
//! The first worksheet is read with its first row as header. Column dtypes
//! follow the cell types: integral numbers without gaps become `Int64`,
//! other numbers `Float64`, booleans `Boolean`, date cells `Datetime[ms]`,
//! everything else `String`.

use crate::error::{AuditError, Result};
use calamine::{Data, DataType as _, Range, Reader, open_workbook_auto_from_rs};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

pub(crate) fn read_first_sheet(bytes: Vec<u8>) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AuditError::EmptyOrMalformedTable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AuditError::EmptyOrMalformedTable("workbook has no sheets".to_string()))?
        .map_err(|e| AuditError::EmptyOrMalformedTable(e.to_string()))?;

    range_to_dataframe(&range)
}

/// Convert a cell range (header row first) into a DataFrame.
pub(crate) fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();
    debug!("Sheet has {} columns and {} data rows", header.len(), body.len());

    let names = header_names(header);
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body.iter().map(|row| &row[idx]).collect();
            cells_to_series(name, &cells).map(Column::from)
        })
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok(DataFrame::new(columns)?)
}

/// Header labels with blanks named by position and duplicates suffixed.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {idx}"),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn is_missing(cell: &Data) -> bool {
    matches!(cell, Data::Empty | Data::Error(_))
}

fn as_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}

/// Date or datetime cell. Durations stay text.
fn is_date(cell: &Data) -> bool {
    match cell {
        Data::DateTime(dt) => dt.is_datetime(),
        Data::DateTimeIso(_) => true,
        _ => false,
    }
}

fn cells_to_series(name: String, cells: &[&Data]) -> PolarsResult<Series> {
    let present: Vec<&&Data> = cells.iter().filter(|c| !is_missing(c)).collect();
    let has_gaps = present.len() < cells.len();

    let all_numeric = present.iter().all(|c| as_number(c).is_some());
    if all_numeric {
        let integral = present
            .iter()
            .filter_map(|c| as_number(c))
            .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);

        if integral && !has_gaps && !present.is_empty() {
            let values: Vec<i64> = present.iter().filter_map(|c| as_number(c)).map(|v| v as i64).collect();
            return Ok(Series::new(name.into(), values));
        }

        // Empty columns land here too and become all-null floats
        let values: Vec<Option<f64>> = cells.iter().map(|c| as_number(c)).collect();
        return Ok(Series::new(name.into(), values));
    }

    if present.iter().all(|c| is_date(c)) {
        let millis: Vec<Option<i64>> = cells
            .iter()
            .map(|c| {
                is_date(c)
                    .then(|| c.as_datetime())
                    .flatten()
                    .map(|dt| dt.and_utc().timestamp_millis())
            })
            .collect();
        return Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None));
    }

    if present.iter().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Ok(Series::new(name.into(), values));
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|c| (!is_missing(c)).then(|| c.to_string()))
        .collect();
    Ok(Series::new(name.into(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::AnomalyDetector;
    use crate::profiler::DataProfiler;
    use crate::utils::ColumnKind;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use std::path::Path;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells[0].len() as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn date(serial: f64) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false))
    }

    fn epoch_millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    fn millis(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
        let column = df.column(name).unwrap().cast(&DataType::Int64).unwrap();
        column.i64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_range_to_dataframe_types() {
        let range = sheet(&[
            &[text("id"), text("price"), text("active"), text("city")],
            &[Data::Float(1.0), Data::Float(9.99), Data::Bool(true), text("Oslo")],
            &[Data::Float(2.0), Data::Empty, Data::Bool(false), Data::Float(3.0)],
            &[Data::Int(3), Data::Float(4.5), Data::Empty, text("Rome")],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.shape(), (3, 4));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("price").unwrap().null_count(), 1);
        assert_eq!(df.column("active").unwrap().dtype(), &DataType::Boolean);
        // Mixed text and numbers fall back to text
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_header_names_blank_and_duplicate() {
        let names = header_names(&[text("a"), Data::Empty, text("a"), text("a")]);
        assert_eq!(names, ["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn test_empty_column_becomes_null_floats() {
        let range = sheet(&[
            &[text("x"), text("blank")],
            &[Data::Float(1.0), Data::Empty],
            &[Data::Float(2.0), Data::Empty],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        let blank = df.column("blank").unwrap();
        assert_eq!(blank.dtype(), &DataType::Float64);
        assert_eq!(blank.null_count(), 2);
    }

    #[test]
    fn test_date_cells_become_datetime() {
        let range = sheet(&[
            &[text("signup"), text("label")],
            &[date(45292.0), date(45292.0)],
            &[Data::Empty, text("late")],
            &[date(45293.5), Data::Empty],
        ]);

        let df = range_to_dataframe(&range).unwrap();
        let signup = df.column("signup").unwrap();
        assert_eq!(
            signup.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(signup.null_count(), 1);
        assert_eq!(
            millis(&df, "signup"),
            [Some(epoch_millis(2024, 1, 1, 0)), None, Some(epoch_millis(2024, 1, 2, 12))]
        );
        // Dates mixed with text stay text
        assert_eq!(df.column("label").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_first_sheet_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/signups.xlsx");
        let df = read_first_sheet(std::fs::read(path).unwrap()).unwrap();

        assert_eq!(df.shape(), (5, 3));
        assert_eq!(df.get_column_names_str(), ["customer", "signup", "spend"]);
        assert_eq!(df.column("customer").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("spend").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            df.column("signup").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(millis(&df, "signup")[0], Some(epoch_millis(2024, 1, 1, 0)));
        assert_eq!(millis(&df, "signup")[1], Some(epoch_millis(2024, 1, 2, 12)));

        let profile = DataProfiler::profile_column(
            df.column("signup").unwrap().as_materialized_series(),
        )
        .unwrap();
        assert_eq!(profile.kind, ColumnKind::Datetime);
        assert_eq!(profile.unique_pct, 100.0);
    }

    #[test]
    fn test_csv_and_sheet_agree_on_empty_column() {
        let mut csv = String::from("x,y,blank\n");
        let mut cells: Vec<Vec<Data>> = vec![vec![text("x"), text("y"), text("blank")]];
        for i in 0..30 {
            let (x, y) = (i % 7, (i * 3) % 5);
            csv.push_str(&format!("{x},{y},\n"));
            cells.push(vec![Data::Int(x), Data::Int(y), Data::Empty]);
        }
        let rows: Vec<&[Data]> = cells.iter().map(Vec::as_slice).collect();

        let from_csv = crate::loader::csv::read_csv(csv.into_bytes()).unwrap();
        let from_sheet = range_to_dataframe(&sheet(&rows)).unwrap();

        assert_eq!(from_csv.dtypes(), from_sheet.dtypes());
        assert_eq!(
            DataProfiler::profile_dataset(&from_csv).unwrap(),
            DataProfiler::profile_dataset(&from_sheet).unwrap()
        );

        let detector = AnomalyDetector::from_config(&Default::default());
        let csv_result = detector.detect(&from_csv).unwrap();
        assert_eq!(csv_result, detector.detect(&from_sheet).unwrap());
        // The empty numeric column leaves no complete row
        assert_eq!(csv_result.candidate_rows(), 0);
    }

    #[test]
    fn test_header_only_sheet() {
        let range = sheet(&[&[text("a"), text("b")]]);
        let df = range_to_dataframe(&range).unwrap();
        assert_eq!(df.shape(), (0, 2));
    }
}
