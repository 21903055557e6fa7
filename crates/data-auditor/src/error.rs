//! Error types for the audit pipeline.
//!
//! Only the loader defines failure modes of its own. Profiling, detection,
//! scoring and issue extraction degrade to default values on odd shapes and
//! only surface errors coming from polars itself.
//!
//! Errors are serializable so a presentation layer can show them as
//! `{ code, message }` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the audit pipeline.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The file extension is not one of `.csv`, `.xlsx`, `.xls`.
    #[error("Unsupported file format '{0}': only CSV and Excel files are supported")]
    UnsupportedFormat(String),

    /// The file parsed into zero columns, or the format reader rejected it.
    #[error("Empty or malformed table: {0}")]
    EmptyOrMalformedTable(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AuditError>,
    },
}

impl AuditError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AuditError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for presentation layers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::EmptyOrMalformedTable(_) => "EMPTY_OR_MALFORMED_TABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was raised while loading the input file.
    ///
    /// Load failures halt the audit before any profiling happens.
    pub fn is_load_failure(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) | Self::EmptyOrMalformedTable(_) => true,
            Self::WithContext { source, .. } => source.is_load_failure(),
            _ => false,
        }
    }
}

impl Serialize for AuditError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AuditError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AuditError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AuditError::Io(e).with_context(context))
    }
}
