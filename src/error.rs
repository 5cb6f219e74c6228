//! Error types for the cleaning pipeline.
//!
//! Every variant belongs to a class (see [`ErrorKind`]): the input is
//! missing, the input cannot be opened, the input is not a usable table, the
//! output cannot be written, or the background run itself crashed. All of
//! them abort the current run without leaving partial output behind.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::column::ColumnLabelError;

/// A row whose width does not match the table's column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaggedRow {
    /// Zero-based row index (header excluded).
    pub row: usize,
    pub width: usize,
    pub expected: usize,
}

impl fmt::Display for RaggedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} has {} cells, expected {}",
            self.row, self.width, self.expected
        )
    }
}

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("File not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error(
        "Permission denied. File may be open in another program: {}: {source}",
        path.display()
    )]
    InputLocked {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Please select a valid Excel file (.xlsx): {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("Failed to read Excel file {}: {message}", path.display())]
    InputFormat { path: PathBuf, message: String },

    #[error("The following required columns are missing: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Malformed rows: {}", join_rows(rows))]
    RaggedRows { rows: Vec<RaggedRow> },

    #[error(transparent)]
    ColumnLabel(#[from] ColumnLabelError),

    #[error(
        "Cannot write to file. It may be open in another program: {}: {source}",
        path.display()
    )]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cleaning {} stopped unexpectedly", path.display())]
    WorkerCrashed { path: PathBuf },
}

/// Coarse error classes surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputNotFound,
    InputLocked,
    InputFormat,
    OutputWrite,
    Internal,
}

impl CleanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CleanError::InputNotFound { .. } => ErrorKind::InputNotFound,
            CleanError::InputLocked { .. } => ErrorKind::InputLocked,
            CleanError::UnsupportedExtension { .. }
            | CleanError::InputFormat { .. }
            | CleanError::MissingColumns { .. }
            | CleanError::RaggedRows { .. }
            | CleanError::ColumnLabel(_) => ErrorKind::InputFormat,
            CleanError::OutputWrite { .. } => ErrorKind::OutputWrite,
            CleanError::WorkerCrashed { .. } => ErrorKind::Internal,
        }
    }
}

fn join_rows(rows: &[RaggedRow]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
