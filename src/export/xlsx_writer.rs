//! Excel 2007+ package writer for a single worksheet.
use crate::error::SheetError;
use crate::export::RowSequence;
use crate::helpers::xml::XmlWriter;
use crate::helpers::zip::ZipPackage;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::CellValue;
use std::collections::HashMap;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_SHARED_STRINGS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const TYPE_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const TYPE_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const TYPE_SHARED_STRINGS: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";
const TYPE_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// Table of distinct strings referenced by index from `t="s"` cells.
#[derive(Debug, Default)]
struct SharedStrings {
    strings: Vec<String>,
    indexes: HashMap<String, usize>,
    /// Number of cells referencing the table
    count: usize,
}

impl SharedStrings {
    /// Adds a string and returns its index; a known string keeps its first index
    fn add(&mut self, string: &str) -> usize {
        self.count += 1;
        if let Some(index) = self.indexes.get(string) {
            return *index;
        }
        let index = self.strings.len();
        self.strings.push(string.to_owned());
        self.indexes.insert(string.to_owned(), index);
        index
    }

    fn to_xml(&self) -> Result<Vec<u8>, SheetError> {
        let count = self.count.to_string();
        let unique_count = self.strings.len().to_string();
        let mut xml = XmlWriter::new()?;
        xml.start("sst", &[("xmlns", NS_MAIN), ("count", &count), ("uniqueCount", &unique_count)])?;
        for string in &self.strings {
            xml.start("si", &[])?;
            xml.text_element("t", text_attributes(string), string)?;
            xml.end("si")?;
        }
        xml.end("sst")?;
        Ok(xml.finish())
    }
}

/// Serializes the rows into an xlsx package with one sheet named `sheet_name`.
///
/// The header row holds the column names. Text goes through the shared string
/// table and empty values produce no cell. Every row gets a `<row>` element,
/// so rows without any value are kept on re-read.
pub(super) fn write(rows: &RowSequence, sheet_name: &str) -> Result<Vec<u8>, SheetError> {
    let mut shared_strings = SharedStrings::default();
    let worksheet = write_worksheet(rows, &mut shared_strings)?;

    let mut package = ZipPackage::new();
    package.add("[Content_Types].xml", &write_content_types()?)?;
    package.add("_rels/.rels", &write_package_relationships()?)?;
    package.add("xl/workbook.xml", &write_workbook(sheet_name)?)?;
    package.add("xl/_rels/workbook.xml.rels", &write_workbook_relationships()?)?;
    package.add("xl/worksheets/sheet1.xml", &worksheet)?;
    package.add("xl/sharedStrings.xml", &shared_strings.to_xml()?)?;
    package.add("xl/styles.xml", &write_styles()?)?;
    package.finish()
}

fn write_worksheet(rows: &RowSequence, shared_strings: &mut SharedStrings) -> Result<Vec<u8>, SheetError> {
    let mut xml = XmlWriter::new()?;
    xml.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;

    let last_col = rows.columns.len().max(1) - 1;
    let dimension = format!("A1:{}", index_to_reference(rows.rows.len(), last_col));
    xml.empty("dimension", &[("ref", &dimension)])?;

    xml.start("sheetData", &[])?;
    let header = rows.columns.iter().map(|column| CellValue::Text(column.to_owned()));
    write_row(&mut xml, shared_strings, 0, header)?;
    for (index, row) in rows.rows.iter().enumerate() {
        let values = rows.columns.iter().map(|column| row.value(column).clone());
        write_row(&mut xml, shared_strings, index + 1, values)?;
    }
    xml.end("sheetData")?;

    xml.end("worksheet")?;
    Ok(xml.finish())
}

fn write_row(
    xml: &mut XmlWriter,
    shared_strings: &mut SharedStrings,
    row: usize,
    values: impl Iterator<Item = CellValue>,
) -> Result<(), SheetError> {
    let number = (row + 1).to_string();
    xml.start("row", &[("r", &number)])?;
    for (col, value) in values.enumerate() {
        let reference = index_to_reference(row, col);
        match value {
            CellValue::Empty => {}
            CellValue::Text(text) => {
                let index = shared_strings.add(&text).to_string();
                xml.start("c", &[("r", &reference), ("t", "s")])?;
                xml.text_element("v", &[], &index)?;
                xml.end("c")?;
            }
            CellValue::Number(number) if number.is_finite() => {
                xml.start("c", &[("r", &reference)])?;
                xml.text_element("v", &[], &number.to_string())?;
                xml.end("c")?;
            }
            // NaN and infinities have no numeric cell form
            CellValue::Number(number) => {
                let index = shared_strings.add(&number.to_string()).to_string();
                xml.start("c", &[("r", &reference), ("t", "s")])?;
                xml.text_element("v", &[], &index)?;
                xml.end("c")?;
            }
            CellValue::Boolean(flag) => {
                xml.start("c", &[("r", &reference), ("t", "b")])?;
                xml.text_element("v", &[], if flag { "1" } else { "0" })?;
                xml.end("c")?;
            }
        }
    }
    xml.end("row")
}

/// Leading or trailing whitespace is only kept under `xml:space="preserve"`
fn text_attributes(text: &str) -> &'static [(&'static str, &'static str)] {
    if text.trim() != text {
        &[("xml:space", "preserve")]
    } else {
        &[]
    }
}

fn write_workbook(sheet_name: &str) -> Result<Vec<u8>, SheetError> {
    let mut xml = XmlWriter::new()?;
    xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    xml.start("sheets", &[])?;
    xml.empty("sheet", &[("name", sheet_name), ("sheetId", "1"), ("r:id", "rId1")])?;
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.finish())
}

fn write_workbook_relationships() -> Result<Vec<u8>, SheetError> {
    write_relationships(&[
        ("rId1", REL_WORKSHEET, "worksheets/sheet1.xml"),
        ("rId2", REL_SHARED_STRINGS, "sharedStrings.xml"),
        ("rId3", REL_STYLES, "styles.xml"),
    ])
}

fn write_package_relationships() -> Result<Vec<u8>, SheetError> {
    write_relationships(&[("rId1", REL_OFFICE_DOCUMENT, "xl/workbook.xml")])
}

fn write_relationships(relationships: &[(&str, &str, &str)]) -> Result<Vec<u8>, SheetError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    for &(id, kind, target) in relationships {
        xml.empty("Relationship", &[("Id", id), ("Type", kind), ("Target", target)])?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn write_content_types() -> Result<Vec<u8>, SheetError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty("Default", &[
        ("Extension", "rels"),
        ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
    ])?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    for (part, content_type) in [
        ("/xl/workbook.xml", TYPE_WORKBOOK),
        ("/xl/worksheets/sheet1.xml", TYPE_WORKSHEET),
        ("/xl/sharedStrings.xml", TYPE_SHARED_STRINGS),
        ("/xl/styles.xml", TYPE_STYLES),
    ] {
        xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

/// The smallest style sheet Excel accepts: one font, the two mandatory fills,
/// one border and the "Normal" cell style.
fn write_styles() -> Result<Vec<u8>, SheetError> {
    let mut xml = XmlWriter::new()?;
    xml.start("styleSheet", &[("xmlns", NS_MAIN)])?;

    xml.start("fonts", &[("count", "1")])?;
    xml.start("font", &[])?;
    xml.empty("sz", &[("val", "11")])?;
    xml.empty("name", &[("val", "Calibri")])?;
    xml.end("font")?;
    xml.end("fonts")?;

    xml.start("fills", &[("count", "2")])?;
    for pattern in ["none", "gray125"] {
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", pattern)])?;
        xml.end("fill")?;
    }
    xml.end("fills")?;

    xml.start("borders", &[("count", "1")])?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom", "diagonal"] {
        xml.empty(side, &[])?;
    }
    xml.end("border")?;
    xml.end("borders")?;

    xml.start("cellStyleXfs", &[("count", "1")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
    xml.end("cellStyleXfs")?;

    xml.start("cellXfs", &[("count", "1")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0"), ("xfId", "0")])?;
    xml.end("cellXfs")?;

    xml.start("cellStyles", &[("count", "1")])?;
    xml.empty("cellStyle", &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")])?;
    xml.end("cellStyles")?;

    xml.end("styleSheet")?;
    Ok(xml.finish())
}
