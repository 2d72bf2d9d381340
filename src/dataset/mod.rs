//! # Dataset Module
//!
//! Turns the first sheet of an uploaded file into a [`Dataset`]: ordered column
//! names taken from the header row and one [`Row`] per following row.
//!
//! ## Column naming
//!
//! The first row present in the sheet is the header. A header cell with
//! text names its column; a blank header cell falls back to the spreadsheet
//! column label of that position (`A`, `B`, ..., `AA`). Names are not made
//! unique: when two headers share a name, the later column's value is the one
//! kept in each row.
use crate::error::ExtractError;
use crate::error::SheetError;
use crate::spreadsheet;
use crate::spreadsheet::reference::index_to_col;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::TabularFormat;
use tracing::debug;
use tracing::info;

mod preview;
mod row;
mod selection;

pub use crate::dataset::preview::Preview;
pub use crate::dataset::preview::PREVIEW_ROWS;
pub use crate::dataset::row::Row;
pub use crate::dataset::selection::Selection;

/// A decoded file: its header-derived columns and all data rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    /// Name of the file the dataset was decoded from
    pub file_name: String,
    /// Column names in header order
    pub columns: Vec<String>,
    /// Data rows in file order; each maps every column name
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset from a sheet, using its first present row as the header.
    pub(crate) fn from_sheet(sheet: &Sheet) -> Self {
        let mut table = sheet.rows();
        let Some(header) = table.next() else {
            return Self {
                file_name: sheet.file_name.to_owned(),
                ..Self::default()
            };
        };

        let col_lower_bound = sheet.col_lower_bound.unwrap_or(0);
        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(offset, cell)| {
                cell.map(|cell| cell.value.to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| index_to_col(col_lower_bound + offset))
            })
            .collect();

        let rows = table
            .map(|record| {
                columns
                    .iter()
                    .zip(record)
                    .map(|(column, cell)| {
                        let value = cell.map(|cell| cell.value.clone()).unwrap_or(CellValue::Empty);
                        (column.as_str(), value)
                    })
                    .collect()
            })
            .collect();

        Self {
            file_name: sheet.file_name.to_owned(),
            columns,
            rows,
        }
    }

    /// Returns true if `column` is one of the header-derived names.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|it| it == column)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Decodes raw file content into a dataset.
///
/// The format is chosen from the extension of `file_name` (`.xlsx` or `.csv`,
/// ignoring case) before any byte is inspected. Only the first sheet is read.
///
/// # Arguments
/// * `bytes` - The file content
/// * `file_name` - Name of the uploaded file
///
/// # Returns
/// The decoded dataset, or `UnsupportedFormat` / `ParseError`
pub fn decode(bytes: &[u8], file_name: &str) -> Result<Dataset, ExtractError> {
    let format = TabularFormat::detect(file_name).ok_or_else(|| ExtractError::UnsupportedFormat {
        name: file_name.to_owned(),
    })?;
    debug!(file_name, %format, size = bytes.len(), "decoding file");

    let sheet = read_first_sheet(format, file_name, bytes).map_err(|source| ExtractError::ParseError {
        name: file_name.to_owned(),
        source,
    })?;
    let dataset = Dataset::from_sheet(&sheet);
    info!(
        file_name,
        columns = dataset.columns.len(),
        rows = dataset.rows.len(),
        "decoded file"
    );
    Ok(dataset)
}

fn read_first_sheet(format: TabularFormat, file_name: &str, bytes: &[u8]) -> Result<Sheet, SheetError> {
    let mut spreadsheet = spreadsheet::open(format, file_name, bytes)?;
    let sheet = spreadsheet.first_sheet()?;
    if sheet.is_empty() {
        Err(SpreadsheetError::EmptySheet(spreadsheet.name()))?
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::zip::ZipPackage;

    fn workbook(sheet: &str) -> Vec<u8> {
        let mut package = ZipPackage::new();
        package.add(
            "xl/workbook.xml",
            br#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        ).unwrap();
        package.add(
            "xl/_rels/workbook.xml.rels",
            br#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        ).unwrap();
        package.add("xl/worksheets/sheet1.xml", sheet.as_bytes()).unwrap();
        package.finish().unwrap()
    }

    #[test]
    fn header_and_rows() {
        let dataset = decode(b"name,age,city\nAlice,30,Paris\nBob,25,\n", "people.csv").unwrap();

        assert_eq!(dataset.file_name, "people.csv");
        assert_eq!(dataset.columns, vec!["name", "age", "city"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows[0].get("city"), Some(&CellValue::from("Paris")));
        assert_eq!(dataset.rows[1].get("city"), Some(&CellValue::Empty));
        assert!(dataset.rows.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn blank_header_uses_column_label() {
        let dataset = decode(b"a,,c\n1,2,3\n", "blank.csv").unwrap();
        assert_eq!(dataset.columns, vec!["a", "B", "c"]);
        assert_eq!(dataset.rows[0].get("B"), Some(&CellValue::from("2")));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let dataset = decode(b"a,b\n1\n1,2,3\n", "ragged.csv").unwrap();

        assert_eq!(dataset.columns, vec!["a", "b", "C"]);
        assert_eq!(dataset.rows[0].get("b"), Some(&CellValue::Empty));
        assert_eq!(dataset.rows[0].get("C"), Some(&CellValue::Empty));
        assert_eq!(dataset.rows[1].get("C"), Some(&CellValue::from("3")));
    }

    #[test]
    fn empty_first_column_keeps_its_label() {
        let dataset = decode(b",b\n,2\n,3\n", "lead.csv").unwrap();

        assert_eq!(dataset.columns, vec!["A", "b"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows[0].get("A"), Some(&CellValue::Empty));
        assert_eq!(dataset.rows[1].get("b"), Some(&CellValue::from("3")));
    }

    #[test]
    fn oversized_dimension_reads_present_rows() {
        let bytes = workbook(
            r#"<worksheet><dimension ref="A1:C400000"/><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c></row>
<row r="2"><c r="A2"><v>1</v></c></row>
<row r="3"><c r="B3"><v>2</v></c></row>
</sheetData></worksheet>"#,
        );
        let dataset = decode(&bytes, "big.xlsx").unwrap();

        assert_eq!(dataset.columns, vec!["id", "B", "C"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows[0].get("id"), Some(&CellValue::from(1.0)));
        assert_eq!(dataset.rows[1].get("B"), Some(&CellValue::from(2.0)));
        assert_eq!(dataset.rows[1].get("C"), Some(&CellValue::Empty));
    }

    #[test]
    fn full_sheet_dimension_reads_present_rows() {
        let bytes = workbook(
            r#"<worksheet><dimension ref="A1:XFD1048576"/><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c></row>
<row r="2"><c r="A2"><v>7</v></c></row>
</sheetData></worksheet>"#,
        );
        let dataset = decode(&bytes, "full.xlsx").unwrap();

        assert_eq!(dataset.columns.len(), 16_384);
        assert_eq!(dataset.columns.last().map(String::as_str), Some("XFD"));
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(dataset.rows[0].get("id"), Some(&CellValue::from(7.0)));
    }

    #[test]
    fn blank_source_rows_are_kept() {
        let bytes = workbook(
            r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>id</t></is></c></row>
<row r="2"></row>
<row r="4"><c r="A4"><v>4</v></c></row>
</sheetData></worksheet>"#,
        );
        let dataset = decode(&bytes, "gaps.xlsx").unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.rows[0].get("id"), Some(&CellValue::Empty));
        assert_eq!(dataset.rows[1].get("id"), Some(&CellValue::from(4.0)));
    }

    #[test]
    fn duplicate_header_keeps_later_value() {
        let dataset = decode(b"x,x\n1,2\n", "dup.csv").unwrap();

        assert_eq!(dataset.columns, vec!["x", "x"]);
        assert_eq!(dataset.rows[0].len(), 1);
        assert_eq!(dataset.rows[0].get("x"), Some(&CellValue::from("2")));
    }

    #[test]
    fn header_only() {
        let dataset = decode(b"a,b\n", "empty.csv").unwrap();
        assert_eq!(dataset.columns, vec!["a", "b"]);
        assert!(dataset.rows.is_empty());
    }

    #[test]
    fn unsupported_format() {
        let error = decode(b"a,b\n", "notes.txt").unwrap_err();
        assert!(matches!(error, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn empty_file_fails() {
        let error = decode(b"", "empty.csv").unwrap_err();
        assert!(matches!(error, ExtractError::ParseError { .. }));
    }

    #[test]
    fn corrupt_workbook_fails() {
        let error = decode(b"not a zip", "broken.xlsx").unwrap_err();
        assert!(matches!(error, ExtractError::ParseError { .. }));
        assert_eq!(
            error.user_message(),
            "Error reading file. Please make sure it's a valid Excel/CSV file."
        );
    }
}
