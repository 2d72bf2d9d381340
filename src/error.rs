use thiserror::Error;

/// Error type for reading and writing tabular files.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    RangeError(#[from] crate::spreadsheet::range::RangeError),
}

impl SheetError {
    /// Returns true when the failure came from reading the underlying bytes
    /// rather than from their content.
    pub(crate) fn is_io(&self) -> bool {
        matches!(self, SheetError::IoError(_))
    }
}

/// Errors surfaced to the caller of a user action.
///
/// Each variant maps to a single human-readable message through
/// [`ExtractError::user_message`].
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file name does not end in `.xlsx` or `.csv`
    #[error("Unsupported file format '{name}': expected .xlsx or .csv")]
    UnsupportedFormat { name: String },

    /// The file content could not be read or decoded
    #[error("Parse '{name}' failed: {source}")]
    ParseError {
        name: String,
        #[source]
        source: SheetError,
    },

    /// An export was requested with an empty selection
    #[error("No columns selected")]
    NoColumnsSelected,

    /// The projected rows could not be serialized
    #[error("Encode '{name}' failed: {source}")]
    EncodeError {
        name: String,
        #[source]
        source: SheetError,
    },
}

impl ExtractError {
    /// The message shown to the user in the error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractError::UnsupportedFormat { .. } => {
                "Please select an Excel (.xlsx) or CSV (.csv) file"
            }
            ExtractError::ParseError { source, .. } if source.is_io() => {
                "Error reading file. Please try again."
            }
            ExtractError::ParseError { .. } => {
                "Error reading file. Please make sure it's a valid Excel/CSV file."
            }
            ExtractError::NoColumnsSelected => "Please select at least one column to download",
            ExtractError::EncodeError { .. } => "Error generating download file. Please try again.",
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetError::WithContextError(format!("{}: {}", message, e)))
    }
}
