//! One cleaning run: load → validate → filter → save.

use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::data::filter::{filter_observed, validate, RuleSet};
use crate::data::{loader, writer};
use crate::error::CleanError;
use crate::progress::{ProgressEvent, ProgressObserver, Stage};

pub const EXTENSION: &str = "xlsx";
const CLEANED_SUFFIX: &str = "_CLEANED";
const DELETED_SUFFIX: &str = "_DELETED";
const VALIDATE_PERCENT: u8 = 20;
const FILTER_PERCENT: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Also write the removed rows to `<stem>_DELETED.xlsx`.
    pub keep_deleted: bool,
    /// Treat the first sheet row as a header.
    pub has_header: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            keep_deleted: false,
            has_header: true,
        }
    }
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub original_rows: usize,
    pub removed_rows: usize,
    pub remaining_rows: usize,
    pub cleaned_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_path: Option<PathBuf>,
}

/// `(<stem>_CLEANED.xlsx, <stem>_DELETED.xlsx)` next to `input`.
pub fn output_paths(input: &Path) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sibling = |suffix: &str| input.with_file_name(format!("{stem}{suffix}.{EXTENSION}"));
    (sibling(CLEANED_SUFFIX), sibling(DELETED_SUFFIX))
}

/// Reject paths that do not exist or are not `.xlsx` files.
pub fn check_input(path: &Path) -> Result<(), CleanError> {
    if !path.exists() {
        return Err(CleanError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EXTENSION));
    if !is_xlsx {
        return Err(CleanError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Clean `input` with `rules`, writing the output file(s) next to it.
///
/// Nothing is written unless loading, validation and filtering all succeed.
pub fn run(
    input: &Path,
    rules: &RuleSet,
    options: CleanOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<RunSummary, CleanError> {
    check_input(input)?;

    observer.on_progress(
        ProgressEvent::new(Stage::Load, input.display().to_string()).with_percent(0),
    );
    let table = loader::load_file(input, options.has_header)?;

    observer.on_progress(
        ProgressEvent::new(
            Stage::Validate,
            format!("{} row(s), {} column(s)", table.len(), table.column_count()),
        )
        .with_percent(VALIDATE_PERCENT),
    );
    validate(&table, rules)?;

    let result = filter_observed(&table, rules, (VALIDATE_PERCENT, FILTER_PERCENT), observer);
    observer.on_progress(
        ProgressEvent::new(
            Stage::Filter,
            format!(
                "{} of {} row(s) removed",
                result.removed_count, result.total_input_rows
            ),
        )
        .with_percent(FILTER_PERCENT),
    );

    let (cleaned_path, deleted_path) = output_paths(input);

    observer.on_progress(
        ProgressEvent::new(Stage::Save, cleaned_path.display().to_string()).with_percent(80),
    );
    writer::save_file(&result.kept, &cleaned_path)?;

    let deleted_path = if options.keep_deleted && result.removed_count > 0 {
        observer.on_progress(
            ProgressEvent::new(Stage::Save, deleted_path.display().to_string()).with_percent(90),
        );
        writer::save_file(&result.removed, &deleted_path)?;
        Some(deleted_path)
    } else {
        None
    };

    let summary = RunSummary {
        input: input.to_path_buf(),
        original_rows: result.total_input_rows,
        removed_rows: result.removed_count,
        remaining_rows: result.kept_count(),
        cleaned_path,
        deleted_path,
    };
    info!(
        "{}: {} row(s) in, {} removed, {} remaining",
        input.display(),
        summary.original_rows,
        summary.removed_rows,
        summary.remaining_rows
    );
    observer.on_progress(ProgressEvent::new(Stage::Done, "cleaning complete").with_percent(100));

    Ok(summary)
}
