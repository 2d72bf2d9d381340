use crate::error::SheetError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::range::Range;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufRead;
use std::io::Cursor;
use tracing::debug;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_DIMENSION: QName = QName(b"dimension");     // Declared used range of a worksheet
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// Represents an Excel XLSX spreadsheet held in memory
pub(crate) struct XlsxSpreadsheet<'a> {
    /// File name of the spreadsheet
    pub(crate) name: String,
    /// ZIP archive containing the XLSX file contents
    zip: ZipArchive<Cursor<&'a [u8]>>,
    /// List of worksheets with (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl<'a> XlsxSpreadsheet<'a> {
    /// Opens an XLSX package and parses its workbook structure
    ///
    /// # Arguments
    /// * `file_name` - Name of the uploaded file
    /// * `bytes` - The package content
    pub(crate) fn open(file_name: &str, bytes: &'a [u8]) -> Result<XlsxSpreadsheet<'a>, SheetError> {
        let (zip, sheets) = excel::open(file_name, Cursor::new(bytes), load_workbook)?;
        debug!(file_name, sheets = sheets.len(), "opened xlsx package");
        Ok(XlsxSpreadsheet {
            name: file_name.to_owned(),
            zip,
            sheets,
        })
    }

    /// Loads all shared strings from the XLSX file
    ///
    /// Shared strings are stored in a separate XML part and referenced by index
    /// from string cells.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, SheetError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }
}

impl Spreadsheet for XlsxSpreadsheet<'_> {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads every cell of the first worksheet
    ///
    /// Cells carrying no value are skipped. Every `<row>` element is kept, even
    /// an empty one. The declared `<dimension>` only widens the column span, so
    /// trailing empty columns are kept while rows come from the sheet data alone.
    fn first_sheet(&mut self) -> Result<Sheet, SheetError> {
        let shared_strings = self.load_shared_strings()?;
        let (sheet_name, zip_path) = self.sheets.first()
            .cloned()
            .ok_or_else(|| SpreadsheetError::SpreadsheetEmptyError(self.name.to_owned()))?;

        let mut sheet = Sheet::new(&self.name, &sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut has_value = false;
        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_DIMENSION => {
                if let Some(reference) = event.get_attribute_value("ref")? {
                    sheet.cover_columns(&Range::try_from(&*reference)?);
                }
            }
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(number) = event.parse_attribute_value::<usize>("r")? {
                    row_count = number.saturating_sub(1);
                }
                col_count = 0;
                sheet.cover_row(row_count);
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                kind = event.get_attribute_value("t")?
                    .map(|t| CellType::parse(&t))
                    .unwrap_or_default();
                value.clear();
                has_value = false;
            }
            Event::Start(event) if event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
                has_value = true;
            }
            Event::Start(event) if event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
                has_value = true;
            }
            Event::End(event) if has_value && event.name() == TAG_CELL => {
                has_value = false;
                if !value.is_empty() {
                    let cell_value = kind.to_value(&value, &shared_strings).map_err(|message| {
                        SpreadsheetError::CellValueError(
                            sheet.file_name.to_owned(),
                            sheet.name.to_owned(),
                            index_to_reference(row, col),
                            message,
                        )
                    })?;
                    sheet.push(Cell { row, col, value: cell_value });
                }
            }
        });

        debug!(
            file_name = %self.name,
            sheet = %sheet.name,
            cells = sheet.cells.len(),
            "read first worksheet"
        );
        Ok(sheet)
    }
}

/// Loads the (name, zip_path) list of worksheets from `xl/workbook.xml`, in workbook order
fn load_workbook<RS: std::io::Read + std::io::Seek>(zip: &mut ZipArchive<RS>) -> Result<Vec<(String, String)>, SheetError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&*id) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Reads string value from XML content, handling text and CDATA sections
///
/// Phonetic runs are skipped. With `is_text_content` the element's own text is
/// collected (as in `<v>`); otherwise only text inside `<t>` children is (as in `<si>`).
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, SheetError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
