use std::io::{self, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tempfile::NamedTempFile;

use super::model::{Cell, Table};
use crate::error::CleanError;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Write `table` (header first, if any) to a single-sheet `.xlsx` at `path`.
///
/// The workbook is rendered in memory and moved into place in one rename, so
/// a failed save never leaves a half-written file at `path`.
pub fn save_file(table: &Table, path: &Path) -> Result<(), CleanError> {
    let output_error = |source: io::Error| CleanError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let buffer = render(table).map_err(|e| output_error(io::Error::other(e)))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(output_error)?;
    tmp.write_all(&buffer).map_err(output_error)?;
    set_output_permissions(tmp.as_file()).map_err(output_error)?;
    tmp.as_file().sync_all().map_err(output_error)?;
    tmp.persist(path).map_err(|e| output_error(e.error))?;

    debug!("wrote {} row(s) to {}", table.len(), path.display());
    Ok(())
}

/// Temp files are created owner-only; outputs get ordinary `rw-r--r--`.
#[cfg(unix)]
fn set_output_permissions(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_output_permissions(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}

fn render(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATETIME_FORMAT);

    {
        let sheet = workbook.add_worksheet();
        let mut row_num: u32 = 0;

        if let Some(header) = table.header() {
            for (col, cell) in header.iter().enumerate() {
                write_cell(sheet, row_num, col, cell, Some(&header_format), &date_format)?;
            }
            row_num += 1;
        }

        for row in table.rows() {
            for (col, cell) in row.iter().enumerate() {
                write_cell(sheet, row_num, col, cell, None, &date_format)?;
            }
            row_num += 1;
        }
    }

    workbook.save_to_buffer()
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: usize,
    cell: &Cell,
    format: Option<&Format>,
    date_format: &Format,
) -> Result<(), XlsxError> {
    let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;

    match (cell, format) {
        (Cell::Null, _) => {}
        (Cell::DateTime(dt), _) => {
            sheet.write_number_with_format(row, col, excel_serial(dt), date_format)?;
        }
        (other, Some(fmt)) => {
            sheet.write_string_with_format(row, col, other.to_string(), fmt)?;
        }
        (Cell::String(s), None) => {
            sheet.write_string(row, col, s)?;
        }
        (Cell::Integer(i), None) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        (Cell::Float(f), None) => {
            sheet.write_number(row, col, *f)?;
        }
        (Cell::Bool(b), None) => {
            sheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

/// Days since 1899-12-30, the 1900 date system's epoch.
fn excel_serial(dt: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (*dt - epoch).num_milliseconds() as f64 / 86_400_000.0
}
