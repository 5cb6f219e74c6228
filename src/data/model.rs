use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{CleanError, RaggedRow};

// ---------------------------------------------------------------------------
// Cell – a single spreadsheet value
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as read from a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Blank cell. Never matches any pattern.
    Null,
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// String form used for pattern matching, `None` for blank cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            // Excel stores every number as a double; show whole values as integers.
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::Null => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Null
        } else {
            Cell::String(s.to_string())
        }
    }
}

pub type Row = Vec<Cell>;

// ---------------------------------------------------------------------------
// Table – one worksheet, rows × columns
// ---------------------------------------------------------------------------

/// Rectangular table of cells. Columns are addressed by position only.
///
/// The header row, when present, is carried along for output but is never
/// part of `rows` and never filtered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    header: Option<Row>,
    rows: Vec<Row>,
    column_count: usize,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header's
    /// (or, without a header, the first row's). Every offending row is
    /// reported, not just the first.
    pub fn new(header: Option<Row>, rows: Vec<Row>) -> Result<Self, CleanError> {
        let column_count = header
            .as_ref()
            .or_else(|| rows.first())
            .map(Vec::len)
            .unwrap_or(0);

        let ragged: Vec<RaggedRow> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.len() != column_count)
            .map(|(row, r)| RaggedRow {
                row,
                width: r.len(),
                expected: column_count,
            })
            .collect();

        if !ragged.is_empty() {
            return Err(CleanError::RaggedRows { rows: ragged });
        }

        Ok(Table {
            header,
            rows,
            column_count,
        })
    }

    /// Build a table padding every short row (and the header) with `Null`
    /// up to the widest row.
    pub fn from_rows_padded(header: Option<Row>, mut rows: Vec<Row>) -> Self {
        let column_count = rows
            .iter()
            .chain(header.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);

        let header = header.map(|mut h| {
            h.resize(column_count, Cell::Null);
            h
        });
        for row in &mut rows {
            row.resize(column_count, Cell::Null);
        }

        Table {
            header,
            rows,
            column_count,
        }
    }

    /// New table sharing this table's header and width.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Table {
            header: self.header.clone(),
            rows,
            column_count: self.column_count,
        }
    }

    pub fn header(&self) -> Option<&Row> {
        self.header.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
