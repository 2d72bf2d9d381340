//! # Spreadsheet Reading Module
//!
//! Decodes uploaded Excel 2007+ (`.xlsx`) and comma-separated (`.csv`) files
//! into a [`Sheet`] of positioned cells. Each format implements the
//! [`Spreadsheet`] trait; [`open`] picks the implementation from a [`TabularFormat`].
use crate::error::SheetError;
use crate::spreadsheet::csv::CsvSpreadsheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::fmt::Display;
use thiserror::Error;

mod cell;
mod csv;
mod excel;
pub(crate) mod range;
pub(crate) mod reference;
mod sheet;
mod xlsx;

pub use crate::spreadsheet::cell::CellValue;
pub(crate) use crate::spreadsheet::sheet::Sheet;

/// Errors raised while interpreting the structure of a spreadsheet file.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// A required part is missing from the package
    #[error("Required part '{0}' not found")]
    FileError(String),

    /// The workbook declares no worksheet
    #[error("Spreadsheet '{0}' contains no sheet")]
    SpreadsheetEmptyError(String),

    /// A cell holds content that does not match its declared type
    #[error("Invalid value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),

    /// The first sheet holds nothing, not even a header row
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),
}

/// Common interface of the supported file readers.
pub(crate) trait Spreadsheet {
    /// Returns the file name the spreadsheet was opened from
    fn name(&self) -> String;

    /// Reads the first sheet of the file
    fn first_sheet(&mut self) -> Result<Sheet, SheetError>;
}

/// File formats accepted on upload and produced on download.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TabularFormat {
    /// Excel 2007+ workbook
    #[default]
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl TabularFormat {
    /// Detects the format from a file name by its extension, ignoring case.
    ///
    /// # Arguments
    /// * `file_name` - Name of the file, with or without directories
    ///
    /// # Returns
    /// The detected format, or `None` for anything other than `.xlsx` and `.csv`
    pub fn detect(file_name: &str) -> Option<TabularFormat> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".xlsx") {
            Some(TabularFormat::Xlsx)
        } else if lower.ends_with(".csv") {
            Some(TabularFormat::Csv)
        } else {
            None
        }
    }

    /// File extension without the leading dot
    pub const fn extension(&self) -> &'static str {
        match self {
            TabularFormat::Xlsx => "xlsx",
            TabularFormat::Csv => "csv",
        }
    }

    /// MIME type of an encoded file
    pub const fn content_type(&self) -> &'static str {
        match self {
            TabularFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            TabularFormat::Csv => "text/csv;charset=utf-8",
        }
    }

    /// Human readable name of the format
    pub const fn label(&self) -> &'static str {
        match self {
            TabularFormat::Xlsx => "Excel (.xlsx)",
            TabularFormat::Csv => "CSV (.csv)",
        }
    }
}

impl Display for TabularFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Opens in-memory file content with the reader for the given format.
///
/// # Arguments
/// * `format` - Format detected from the file name
/// * `file_name` - Name of the file, used in error messages
/// * `bytes` - The file content
///
/// # Returns
/// A reader positioned to decode the first sheet
pub(crate) fn open<'a>(
    format: TabularFormat,
    file_name: &str,
    bytes: &'a [u8],
) -> Result<Box<dyn Spreadsheet + 'a>, SheetError> {
    Ok(match format {
        TabularFormat::Xlsx => Box::new(XlsxSpreadsheet::open(file_name, bytes)?),
        TabularFormat::Csv => Box::new(CsvSpreadsheet::open(file_name, bytes)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format() {
        assert_eq!(TabularFormat::detect("people.csv"), Some(TabularFormat::Csv));
        assert_eq!(TabularFormat::detect("Report.XLSX"), Some(TabularFormat::Xlsx));
        assert_eq!(TabularFormat::detect("dir.csv/report.xlsx"), Some(TabularFormat::Xlsx));
        assert_eq!(TabularFormat::detect("legacy.xls"), None);
        assert_eq!(TabularFormat::detect("notes.txt"), None);
        assert_eq!(TabularFormat::detect("csv"), None);
    }

    #[test]
    fn format_properties() {
        assert_eq!(TabularFormat::default(), TabularFormat::Xlsx);
        assert_eq!(TabularFormat::Csv.extension(), "csv");
        assert_eq!(TabularFormat::Xlsx.to_string(), "xlsx");
        assert!(TabularFormat::Xlsx.content_type().contains("spreadsheetml"));
    }

    #[test]
    fn open_dispatches_by_format() {
        let mut spreadsheet = open(TabularFormat::Csv, "a.csv", b"x,y\n1,2\n").unwrap();
        assert_eq!(spreadsheet.name(), "a.csv");
        assert_eq!(spreadsheet.first_sheet().unwrap().cells.len(), 4);

        assert!(open(TabularFormat::Xlsx, "a.xlsx", b"x,y\n1,2\n").is_err());
    }
}
