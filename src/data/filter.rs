use log::{debug, warn};

use super::column::to_label;
use super::model::{Cell, Row, Table};
use crate::error::CleanError;
use crate::progress::{ProgressEvent, ProgressObserver, Stage};

// ---------------------------------------------------------------------------
// Rules: which substrings in which column cause a row to be removed
// ---------------------------------------------------------------------------

/// Remove a row when the cell at `column` contains any of `patterns`
/// (case-insensitive substring match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    /// Display name, e.g. "Order".
    pub name: String,
    /// Zero-based column position.
    pub column: usize,
    pub patterns: Vec<String>,
}

impl ColumnRule {
    pub fn new(name: impl Into<String>, column: usize, patterns: &[&str]) -> Self {
        Self {
            name: name.into(),
            column,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Spreadsheet letter of this rule's column.
    pub fn label(&self) -> String {
        to_label(self.column)
    }

    /// Whether `cell` contains any pattern. Blank cells never match.
    pub fn contains_pattern(&self, cell: &Cell) -> bool {
        let Some(text) = cell.as_text() else {
            return false;
        };
        let text = text.to_lowercase();
        self.patterns
            .iter()
            .any(|p| text.contains(&p.to_lowercase()))
    }

    /// Whether this rule removes `row`. Rows too short for the column never match.
    pub fn matches(&self, row: &Row) -> bool {
        row.get(self.column)
            .is_some_and(|cell| self.contains_pattern(cell))
    }

    fn describe(&self) -> String {
        format!("{} (Column {})", self.name, self.label())
    }
}

/// Ordered collection of [`ColumnRule`]s. Rules are independent: a row is
/// removed as soon as any one of them matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<ColumnRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    /// The order-export cleaning rules. "GB" deliberately sits next to the
    /// longer "GB Test" / "GB Testing" patterns; keep all three.
    fn default() -> Self {
        Self::new(vec![
            // BV
            ColumnRule::new("ShipmentID", 73, &["FOC"]),
            // H
            ColumnRule::new(
                "Order",
                7,
                &["test", "testing", "M88", "GB Test", "GB Testing", "GB"],
            ),
            // I
            ColumnRule::new("Buyer PO Number", 8, &["test", "testing", "FOC"]),
            // BO
            ColumnRule::new("Comment", 66, &["FOC", "M88"]),
        ])
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Fail with [`CleanError::MissingColumns`] listing every rule whose column
/// lies beyond the table's width.
pub fn validate(table: &Table, rules: &RuleSet) -> Result<(), CleanError> {
    let missing: Vec<String> = rules
        .rules()
        .iter()
        .filter(|r| r.column >= table.column_count())
        .map(ColumnRule::describe)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CleanError::MissingColumns { missing })
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows split into the ones that survived and the ones that matched a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub kept: Table,
    pub removed: Table,
    pub total_input_rows: usize,
    pub removed_count: usize,
}

impl FilterResult {
    pub fn kept_count(&self) -> usize {
        self.kept.len()
    }
}

/// Split `table` into kept and removed rows.
///
/// Rules whose column is out of range are skipped. Relative row order is
/// preserved in both outputs; the input is left untouched.
pub fn filter(table: &Table, rules: &RuleSet) -> FilterResult {
    let active = active_rules(table, rules);
    let keep: Vec<bool> = table
        .rows()
        .iter()
        .map(|row| !active.iter().any(|rule| rule.matches(row)))
        .collect();
    partition(table, &keep)
}

/// Same result as [`filter`], reporting one [`Stage::RuleEvaluated`] event
/// per rule with the number of rows that rule matched on its own.
///
/// Percentages advance from `start` (exclusive) to `end` (inclusive).
pub fn filter_observed(
    table: &Table,
    rules: &RuleSet,
    (start, end): (u8, u8),
    observer: &mut dyn ProgressObserver,
) -> FilterResult {
    let span = end.saturating_sub(start) as usize;
    let active = active_rules(table, rules);
    let mut keep = vec![true; table.len()];

    for (i, rule) in active.iter().enumerate() {
        let mut hits = 0usize;
        for (flag, row) in keep.iter_mut().zip(table.rows()) {
            if rule.matches(row) {
                hits += 1;
                *flag = false;
            }
        }
        debug!("rule {} matched {hits} row(s)", rule.describe());
        let percent = start + ((i + 1) * span / active.len()) as u8;
        observer.on_progress(
            ProgressEvent::new(
                Stage::RuleEvaluated,
                format!("{}: {hits} matching row(s)", rule.describe()),
            )
            .with_percent(percent),
        );
    }

    partition(table, &keep)
}

fn active_rules<'a>(table: &Table, rules: &'a RuleSet) -> Vec<&'a ColumnRule> {
    rules
        .rules()
        .iter()
        .filter(|rule| {
            let in_range = rule.column < table.column_count();
            if !in_range {
                warn!(
                    "skipping rule {}: table has only {} column(s)",
                    rule.describe(),
                    table.column_count()
                );
            }
            in_range
        })
        .collect()
}

fn partition(table: &Table, keep: &[bool]) -> FilterResult {
    let (kept, removed): (Vec<(&Row, bool)>, Vec<(&Row, bool)>) = table
        .rows()
        .iter()
        .zip(keep.iter().copied())
        .partition(|(_, k)| *k);

    let kept: Vec<Row> = kept.into_iter().map(|(r, _)| r.clone()).collect();
    let removed: Vec<Row> = removed.into_iter().map(|(r, _)| r.clone()).collect();
    let removed_count = removed.len();

    FilterResult {
        kept: table.with_rows(kept),
        removed: table.with_rows(removed),
        total_input_rows: table.len(),
        removed_count,
    }
}
