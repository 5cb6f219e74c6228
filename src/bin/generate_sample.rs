use std::path::PathBuf;

use anyhow::{Context, Result};
use xlsx_cleaner::data::column::to_position;
use xlsx_cleaner::data::writer::save_file;
use xlsx_cleaner::{Cell, Table};

/// 74 columns reach BV.
const NUM_COLUMNS: usize = 74;
const NUM_ROWS: usize = 20;

/// (row, column label, value, removed?)
const CELLS: &[(usize, &str, &str, bool)] = &[
    (0, "H", "Normal Order", false),
    (1, "H", "Test Order", true),
    (2, "H", "M88-12345", true),
    (3, "H", "GB Testing Order", true),
    (4, "H", "GB Order", true),
    (5, "H", "Valid Order", false),
    (6, "I", "PO-Testing-123", true),
    (7, "I", "FOC-PO", true),
    (8, "I", "Valid PO", false),
    (9, "BO", "FOC Comment", true),
    (10, "BO", "M88 in comment", true),
    (11, "BO", "Normal comment", false),
    (12, "BV", "FOC123", true),
    (13, "BV", "foc-shipment", true),
    (14, "BV", "Valid Shipment", false),
    (15, "H", "Order 15", false),
    (15, "I", "PO 15", false),
    (15, "BO", "Comment 15", false),
    (15, "BV", "Ship 15", false),
    (16, "H", "Order 16", false),
    (16, "I", "PO 16", false),
    (16, "BO", "Comment 16", false),
    (16, "BV", "Ship 16", false),
];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test_sample.xlsx"));

    let header: Vec<Cell> = (0..NUM_COLUMNS)
        .map(|i| Cell::String(format!("Col_{i}")))
        .collect();

    // Column A carries a row id so trailing rows are never entirely blank.
    let mut rows: Vec<Vec<Cell>> = (0..NUM_ROWS)
        .map(|r| {
            let mut row = vec![Cell::Null; NUM_COLUMNS];
            row[0] = Cell::String(format!("Row {r}"));
            row
        })
        .collect();

    for &(r, label, value, _) in CELLS {
        let col = to_position(label).with_context(|| format!("bad column label {label}"))?;
        rows[r][col] = Cell::from(value);
    }

    let table = Table::new(Some(header), rows).context("building sample table")?;
    save_file(&table, &output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;

    let mut removed: Vec<usize> = CELLS.iter().filter(|c| c.3).map(|c| c.0).collect();
    removed.dedup();

    println!("Wrote {NUM_ROWS} rows x {NUM_COLUMNS} columns to {}", output_path.display());
    println!("Expected removals ({}):", removed.len());
    for &(r, label, value, is_removed) in CELLS {
        if is_removed {
            println!("  - row {r}: '{value}' in column {label}");
        }
    }
    println!("Expected remaining: {}", NUM_ROWS - removed.len());
    Ok(())
}
