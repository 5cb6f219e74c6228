use thiserror::Error;

// ---------------------------------------------------------------------------
// Spreadsheet column labels ("A", "BV", ...) ⇄ zero-based positions
// ---------------------------------------------------------------------------

/// A column label that is not a bijective base-26 numeral.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnLabelError {
    #[error("Column label is empty")]
    Empty,
    #[error("Invalid character '{ch}' in column label '{label}'")]
    InvalidChar { label: String, ch: char },
    #[error("Column label '{0}' is too large")]
    Overflow(String),
}

/// Convert a column label to its zero-based position (`A` → 0, `AA` → 26).
///
/// Letters are case-insensitive. Anything other than ASCII letters is rejected.
pub fn to_position(label: &str) -> Result<usize, ColumnLabelError> {
    if label.is_empty() {
        return Err(ColumnLabelError::Empty);
    }

    let mut acc: usize = 0;
    for ch in label.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(ColumnLabelError::InvalidChar {
                label: label.to_string(),
                ch,
            });
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        acc = acc
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| ColumnLabelError::Overflow(label.to_string()))?;
    }
    Ok(acc - 1)
}

/// Inverse of [`to_position`]: `0` → `A`, `73` → `BV`.
pub fn to_label(position: usize) -> String {
    let mut n = position;
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}
