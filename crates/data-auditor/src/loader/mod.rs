//! Loading uploaded files into a polars `DataFrame`.
//!
//! The format is chosen from the declared file name's extension. Only CSV
//! and the two Excel variants are accepted; anything else fails with
//! [`AuditError::UnsupportedFormat`] before the stream is read.

mod csv;
mod excel;

use crate::error::{AuditError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Accepted input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 3] = ["csv", "xlsx", "xls"];

    /// Detect the format from a file name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") => Ok(FileFormat::Xlsx),
            Some("xls") => Ok(FileFormat::Xls),
            _ => Err(AuditError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn is_spreadsheet(self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }
}

/// Parses uploaded files into tables.
pub struct DataLoader;

impl DataLoader {
    /// Load a table from a file on disk.
    pub fn load_path(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        let format = FileFormat::from_name(&name)?;

        info!("Loading dataset from: {}", path.display());
        let file = File::open(path)?;
        Self::load_format(format, file)
    }

    /// Load a table from a stream, using `name` only to pick the format.
    pub fn load_reader<R: Read>(name: &str, reader: R) -> Result<DataFrame> {
        let format = FileFormat::from_name(name)?;
        Self::load_format(format, reader)
    }

    fn load_format<R: Read>(format: FileFormat, mut reader: R) -> Result<DataFrame> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        debug!("Read {} bytes as {:?}", bytes.len(), format);

        let df = match format {
            FileFormat::Csv => csv::read_csv(bytes)?,
            FileFormat::Xlsx | FileFormat::Xls => excel::read_first_sheet(bytes)?,
        };

        if df.width() == 0 {
            return Err(AuditError::EmptyOrMalformedTable(
                "file contains no columns".to_string(),
            ));
        }

        info!("Dataset loaded successfully: {:?}", df.shape());
        Ok(df)
    }
}
