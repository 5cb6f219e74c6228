use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use calamine::{Data, DataType, Reader, Xlsx};
use log::debug;

use super::model::{Cell, Row, Table};
use crate::error::CleanError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the first worksheet of an `.xlsx` workbook.
///
/// When `has_header` is set the first row becomes the table header and is
/// excluded from the data rows.
pub fn load_file(path: &Path, has_header: bool) -> Result<Table, CleanError> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut workbook: Xlsx<_> =
        Xlsx::new(BufReader::new(file)).map_err(|e| format_error(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleanError::InputFormat {
            path: path.to_path_buf(),
            message: "workbook has no worksheets".into(),
        })?
        .map_err(|e| format_error(path, e))?;

    // calamine ranges begin at the first used cell; restore the leading
    // blank columns so rule positions still line up with sheet letters.
    let first_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let mut rows: Vec<Row> = range
        .rows()
        .map(|cells| {
            let mut row = vec![Cell::Null; first_col];
            row.extend(cells.iter().map(convert_cell));
            row
        })
        .collect();

    let header = if has_header && !rows.is_empty() {
        Some(rows.remove(0))
    } else {
        None
    };

    let table = Table::from_rows_padded(header, rows);
    debug!(
        "loaded {} row(s) x {} column(s) from {}",
        table.len(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

// -- helpers --

fn open_error(path: &Path, err: io::Error) -> CleanError {
    match err.kind() {
        io::ErrorKind::NotFound => CleanError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => CleanError::InputLocked {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

fn format_error(path: &Path, err: impl std::fmt::Display) -> CleanError {
    CleanError::InputFormat {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Map a calamine cell onto our [`Cell`].
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or(Cell::Float(dt.as_f64())),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::from(s.as_str())),
        Data::Error(e) => Cell::String(e.to_string()),
    }
}
