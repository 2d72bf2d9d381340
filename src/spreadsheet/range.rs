use crate::error::SheetError;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use thiserror::Error;

/// Errors related to Excel-style range parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),
}

/// Represents an Excel-style cell range with optional boundaries,
/// as found in a worksheet's `<dimension ref="A1:C5"/>`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Range {
    /// Lower row bound (0-based index), None for unbounded
    pub(crate) row_lower_bound: Option<usize>,
    /// Upper row bound (0-based index), None for unbounded
    pub(crate) row_upper_bound: Option<usize>,
    /// Lower column bound (0-based index), None for unbounded
    pub(crate) col_lower_bound: Option<usize>,
    /// Upper column bound (0-based index), None for unbounded
    pub(crate) col_upper_bound: Option<usize>,
}

impl TryFrom<&str> for Range {
    type Error = SheetError;

    /// Parses an Excel-style range string (e.g., "A1", "B2:C5", "$A$1:$D$9").
    /// A single cell yields a range whose lower and upper bounds coincide.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^\$?([A-Z]*)\$?(\d*)(:\$?([A-Z]*)\$?(\d*))?$").expect("Hardcode regex pattern");
        let value = value.trim().to_ascii_uppercase();
        let captures = pattern
            .captures(value.as_str())
            .ok_or(RangeError::FormatError(value.to_owned()))?;
        let col_lower_bound = captures.get(1).map(|matcher| matcher.as_str()).and_then(col_to_index);
        let row_lower_bound = captures.get(2).map(|matcher| matcher.as_str()).and_then(row_to_index);
        let is_single = captures.get(3).is_none();
        Ok(Range {
            col_lower_bound,
            row_lower_bound,
            col_upper_bound: if is_single {
                col_lower_bound
            } else {
                captures.get(4).map(|matcher| matcher.as_str()).and_then(col_to_index)
            },
            row_upper_bound: if is_single {
                row_lower_bound
            } else {
                captures.get(5).map(|matcher| matcher.as_str()).and_then(row_to_index)
            },
        })
    }
}
