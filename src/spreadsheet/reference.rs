//! Conversions between zero-based (row, column) indexes and A1-style references.

/// Number of columns a worksheet can hold (A..XFD)
pub(crate) const MAX_COLUMNS: usize = 16_384;

/// Number of rows a worksheet can hold
pub(crate) const MAX_ROWS: usize = 1_048_576;

/// Converts a zero-based column index to its letter label (0 -> "A", 26 -> "AA").
pub(crate) fn index_to_col(col: usize) -> String {
    let mut col = col + 1;
    let mut label = String::new();
    while col > 0 {
        col -= 1;
        label.insert(0, char::from(b'A' + (col % 26) as u8));
        col /= 26;
    }
    label
}

/// Converts zero-based row and column indexes to an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}

/// Converts a column label ("A", "ab", "$C") to a zero-based index.
/// Labels past `XFD` are rejected.
pub(crate) fn col_to_index(label: &str) -> Option<usize> {
    let label = label.trim_start_matches('$');
    if label.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for char in label.chars() {
        if !char.is_ascii_alphabetic() {
            return None;
        }
        let digit = (char.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1).filter(|&index| index < MAX_COLUMNS)
}

/// Converts a one-based row number ("1", "$12") to a zero-based index.
/// Rows past 1048576 are rejected.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .trim_start_matches('$')
        .parse::<usize>()
        .ok()
        .and_then(|row| row.checked_sub(1))
        .filter(|&row| row < MAX_ROWS)
}

/// Converts an A1-style reference ("B3", "$B$3") to zero-based (row, column) indexes.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.replace('$', "");
    let split = reference.find(|char: char| char.is_ascii_digit())?;
    let (col, row) = reference.split_at(split);
    Some((row_to_index(row)?, col_to_index(col)?))
}
