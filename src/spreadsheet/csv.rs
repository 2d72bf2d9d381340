use crate::error::SheetError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use csv::ReaderBuilder;
use encoding_rs::UTF_8;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use tracing::debug;

/// Represents a comma-separated text file held in memory
pub(crate) struct CsvSpreadsheet<'a> {
    /// File name of the spreadsheet
    pub(crate) name: String,
    /// Raw file content
    bytes: &'a [u8],
}

impl<'a> CsvSpreadsheet<'a> {
    pub(crate) fn open(file_name: &str, bytes: &'a [u8]) -> CsvSpreadsheet<'a> {
        CsvSpreadsheet {
            name: file_name.to_owned(),
            bytes,
        }
    }
}

impl Spreadsheet for CsvSpreadsheet<'_> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads every record as one sheet row; each non-empty field becomes a text cell
    fn first_sheet(&mut self) -> Result<Sheet, SheetError> {
        let content = decode_text(self.bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut sheet = Sheet::new(&self.name, "Sheet1");
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            if record.is_empty() {
                continue;
            }
            // Every record starts at column A, even when its leading fields are empty
            sheet.cover(row, 0);
            sheet.cover(row, record.len() - 1);
            for (col, field) in record.iter().enumerate() {
                if !field.is_empty() {
                    sheet.push(Cell {
                        row,
                        col,
                        value: CellValue::Text(field.to_owned()),
                    });
                }
            }
        }

        debug!(file_name = %self.name, cells = sheet.cells.len(), "read csv records");
        Ok(sheet)
    }
}

/// Decodes file bytes as UTF-8 (dropping a BOM), falling back to Windows-1252
/// when the content is not valid UTF-8.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text;
    }
    debug!("csv content is not valid UTF-8, decoding as windows-1252");
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(content: &[u8]) -> Sheet {
        CsvSpreadsheet::open("test.csv", content).first_sheet().unwrap()
    }

    #[test]
    fn reads_records() {
        let sheet = read(b"name,age\nAlice,30\nBob,25\n");
        assert_eq!(sheet.bounds(), Some((0, 2, 0, 1)));
        assert_eq!(sheet.get(1, 0).map(|cell| cell.value.clone()), Some(CellValue::from("Alice")));
        assert_eq!(sheet.get(2, 1).map(|cell| cell.value.clone()), Some(CellValue::from("25")));
    }

    #[test]
    fn quoted_fields() {
        let sheet = read(b"a,b\n\"x, y\",\"say \"\"hi\"\"\"\n\"multi\nline\",z\n");
        assert_eq!(sheet.get(1, 0).map(|cell| cell.value.to_string()), Some("x, y".to_owned()));
        assert_eq!(sheet.get(1, 1).map(|cell| cell.value.to_string()), Some("say \"hi\"".to_owned()));
        assert_eq!(sheet.get(2, 0).map(|cell| cell.value.to_string()), Some("multi\nline".to_owned()));
    }

    #[test]
    fn ragged_rows_and_empty_fields() {
        let sheet = read(b"a,,c\n1\n,,\n");
        assert_eq!(sheet.bounds(), Some((0, 2, 0, 2)));
        assert!(sheet.get(0, 1).is_none());
        assert!(sheet.get(2, 0).is_none());
        assert_eq!(sheet.cells.len(), 3);
    }

    #[test]
    fn empty_leading_column_is_kept() {
        let sheet = read(b",b\n,2\n,3\n");
        assert_eq!(sheet.bounds(), Some((0, 2, 0, 1)));
        assert!(sheet.get(0, 0).is_none());
        assert_eq!(sheet.rows().next().map(|row| row.len()), Some(2));
    }

    #[test]
    fn bom_and_legacy_encoding() {
        let sheet = read(b"\xEF\xBB\xBFname\nJos\xC3\xA9\n");
        assert_eq!(sheet.get(0, 0).map(|cell| cell.value.to_string()), Some("name".to_owned()));
        assert_eq!(sheet.get(1, 0).map(|cell| cell.value.to_string()), Some("José".to_owned()));

        let sheet = read(b"name\nJos\xE9\n");
        assert_eq!(sheet.get(1, 0).map(|cell| cell.value.to_string()), Some("José".to_owned()));
    }

    #[test]
    fn empty_content() {
        assert!(read(b"").is_empty());
    }
}
