use crate::spreadsheet::reference::index_to_reference;
use std::fmt::Display;

/// Value held by one cell of a decoded file.
///
/// Values are kept as found in the source; no type is inferred from text.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Boolean(bool),
}

impl CellValue {
    /// Returns true if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(value) => write!(f, "{}", value),
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Boolean(true) => write!(f, "TRUE"),
            CellValue::Boolean(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

/// Types of raw cell data in xlsx worksheets, taken from the `t` attribute.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Number,
    /// Boolean values (1/0)
    Boolean,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline or formula string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Parses the `t` attribute of a `<c>` element.
    pub(crate) fn parse(kind: &str) -> Self {
        match kind {
            "inlineStr" | "str" => Self::InlineString,
            "s" => Self::SharedString,
            "d" => Self::IsoDateTime,
            "b" => Self::Boolean,
            "e" => Self::Error,
            _ => Self::Number,
        }
    }

    /// Converts raw cell content to a value, resolving shared string indexes.
    pub(crate) fn to_value(self, raw: &str, shared_strings: &[String]) -> Result<CellValue, String> {
        match self {
            Self::Number => raw
                .trim()
                .parse::<f64>()
                .map(CellValue::Number)
                .map_err(|_| format!("parse '{}' to number failed", raw)),
            Self::Boolean => Ok(CellValue::Boolean(raw.trim() == "1" || raw.trim().eq_ignore_ascii_case("true"))),
            Self::SharedString => raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .map(|string| CellValue::Text(string.to_owned()))
                .ok_or_else(|| format!("shared string '{}' not found", raw)),
            Self::IsoDateTime | Self::InlineString | Self::Error => Ok(CellValue::Text(raw.to_owned())),
        }
    }
}

/// A single non-empty cell of a sheet with its position.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell value
    pub(crate) value: CellValue,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }
}
