use std::path::{Path, PathBuf};
use std::process::Command;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use xlsx_cleaner::pipeline::{self, CleanOptions};
use xlsx_cleaner::progress::{NoopObserver, ProgressEvent, Stage};
use xlsx_cleaner::{CleanError, RuleSet};

const NUM_COLUMNS: u16 = 74;

/// Write a workbook with a `Col_i` header over `width` columns, a row id in
/// column A, and the given `(row, col, value)` cells.
fn write_workbook(path: &Path, width: u16, rows: u32, cells: &[(u32, u16, &str)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for c in 0..width {
        sheet.write_string(0, c, format!("Col_{c}")).unwrap();
    }
    for r in 0..rows {
        sheet.write_string(r + 1, 0, format!("Row {r}")).unwrap();
    }
    for &(r, c, v) in cells {
        sheet.write_string(r + 1, c, v).unwrap();
    }
    workbook.save(path).unwrap();
}

fn reference_cells() -> Vec<(u32, u16, &'static str)> {
    vec![
        (0, 7, "Normal Order"),
        (1, 7, "Test Order"),
        (2, 7, "M88-12345"),
        (3, 7, "GB Testing Order"),
        (4, 7, "GB Order"),
        (5, 7, "Valid Order"),
        (6, 8, "PO-Testing-123"),
        (7, 8, "FOC-PO"),
        (8, 8, "Valid PO"),
        (9, 66, "FOC Comment"),
        (10, 66, "M88 in comment"),
        (11, 66, "Normal comment"),
        (12, 73, "FOC123"),
        (13, 73, "foc-shipment"),
        (14, 73, "Valid Shipment"),
        (15, 7, "Order 15"),
        (15, 8, "PO 15"),
        (15, 66, "Comment 15"),
        (15, 73, "Ship 15"),
        (16, 7, "Order 16"),
        (16, 8, "PO 16"),
        (16, 66, "Comment 16"),
        (16, 73, "Ship 16"),
    ]
}

fn reference_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("test_sample.xlsx");
    write_workbook(&path, NUM_COLUMNS, 20, &reference_cells());
    path
}

/// Row ids (column A) of the data rows in a written workbook.
fn row_ids(path: &Path) -> Vec<String> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();
    range
        .rows()
        .skip(1)
        .map(|r| match &r[0] {
            Data::String(s) => s.clone(),
            other => panic!("unexpected row id {other:?}"),
        })
        .collect()
}

fn ids(rows: &[u32]) -> Vec<String> {
    rows.iter().map(|r| format!("Row {r}")).collect()
}

#[test]
fn reference_sample_removes_ten_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = reference_workbook(dir.path());

    let summary = pipeline::run(
        &input,
        &RuleSet::default(),
        CleanOptions::default(),
        &mut NoopObserver,
    )
    .unwrap();

    assert_eq!(summary.original_rows, 20);
    assert_eq!(summary.removed_rows, 10);
    assert_eq!(summary.remaining_rows, 10);
    assert_eq!(summary.cleaned_path, dir.path().join("test_sample_CLEANED.xlsx"));
    assert_eq!(summary.deleted_path, None);
    assert!(!dir.path().join("test_sample_DELETED.xlsx").exists());

    assert_eq!(
        row_ids(&summary.cleaned_path),
        ids(&[0, 5, 8, 11, 14, 15, 16, 17, 18, 19])
    );
}

#[test]
fn keep_deleted_writes_removed_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = reference_workbook(dir.path());

    let options = CleanOptions {
        keep_deleted: true,
        ..CleanOptions::default()
    };
    let summary = pipeline::run(&input, &RuleSet::default(), options, &mut NoopObserver).unwrap();

    let deleted = summary.deleted_path.expect("deleted file path");
    assert_eq!(deleted, dir.path().join("test_sample_DELETED.xlsx"));
    assert_eq!(row_ids(&deleted), ids(&[1, 2, 3, 4, 6, 7, 9, 10, 12, 13]));
}

#[test]
fn keep_deleted_skips_empty_removed_set() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clean.xlsx");
    write_workbook(&input, NUM_COLUMNS, 3, &[(0, 7, "Order 1"), (1, 73, "Ship 2")]);

    let options = CleanOptions {
        keep_deleted: true,
        ..CleanOptions::default()
    };
    let summary = pipeline::run(&input, &RuleSet::default(), options, &mut NoopObserver).unwrap();

    assert_eq!(summary.removed_rows, 0);
    assert_eq!(summary.deleted_path, None);
    assert!(!dir.path().join("clean_DELETED.xlsx").exists());
}

#[test]
fn narrow_sheet_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("narrow.xlsx");
    write_workbook(&input, 5, 4, &[(0, 1, "test")]);

    let mut events: Vec<ProgressEvent> = Vec::new();
    let err = pipeline::run(&input, &RuleSet::default(), CleanOptions::default(), &mut events)
        .unwrap_err();

    match err {
        CleanError::MissingColumns { missing } => assert_eq!(missing.len(), 4),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!events.iter().any(|e| e.stage == Stage::RuleEvaluated));
    assert!(!dir.path().join("narrow_CLEANED.xlsx").exists());
}

#[test]
fn leading_blank_columns_keep_positions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("offset.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for c in 7..NUM_COLUMNS {
        sheet.write_string(0, c, format!("Col_{c}")).unwrap();
    }
    sheet.write_string(1, 7, "Test order").unwrap();
    sheet.write_string(2, 7, "Real order").unwrap();
    sheet.write_string(3, 73, "FOC").unwrap();
    workbook.save(&input).unwrap();

    let summary = pipeline::run(
        &input,
        &RuleSet::default(),
        CleanOptions::default(),
        &mut NoopObserver,
    )
    .unwrap();
    assert_eq!(summary.original_rows, 3);
    assert_eq!(summary.removed_rows, 2);
}

#[test]
fn progress_reaches_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let input = reference_workbook(dir.path());

    let mut events: Vec<ProgressEvent> = Vec::new();
    pipeline::run(&input, &RuleSet::default(), CleanOptions::default(), &mut events).unwrap();

    let stages: Vec<Stage> = events.iter().map(|e| e.stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::Load,
            Stage::Validate,
            Stage::RuleEvaluated,
            Stage::RuleEvaluated,
            Stage::RuleEvaluated,
            Stage::RuleEvaluated,
            Stage::Filter,
            Stage::Save,
            Stage::Done,
        ]
    );

    let percents: Vec<u8> = events.iter().filter_map(|e| e.percent).collect();
    assert_eq!(percents.len(), events.len());
    assert!(
        percents.windows(2).all(|w| w[0] <= w[1]),
        "progress went backwards: {percents:?}"
    );
    assert_eq!(percents.last(), Some(&100));
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

fn cleaner_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xlsx-cleaner"))
}

#[test]
fn cli_reports_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = reference_workbook(dir.path());

    let output = cleaner_cmd()
        .arg("--json")
        .arg("--keep-deleted")
        .arg("--progress")
        .arg(&input)
        .output()
        .expect("failed to run xlsx-cleaner");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["original_rows"], 20);
    assert_eq!(summary["removed_rows"], 10);
    assert_eq!(summary["remaining_rows"], 10);
    assert!(summary["deleted_path"].is_string());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("RuleEvaluated"), "stderr: {stderr}");
    assert!(stderr.contains("[100%] Done"), "stderr: {stderr}");
}

#[test]
fn cli_exit_codes_for_bad_input() {
    let dir = tempfile::tempdir().unwrap();

    let output = cleaner_cmd()
        .arg(dir.path().join("missing.xlsx"))
        .output()
        .expect("failed to run xlsx-cleaner");
    assert_eq!(output.status.code(), Some(2));

    let csv = dir.path().join("orders.csv");
    std::fs::write(&csv, "a,b\n").unwrap();
    let output = cleaner_cmd().arg(&csv).output().expect("failed to run xlsx-cleaner");
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains(".xlsx"));
}
