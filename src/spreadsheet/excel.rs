//! Microsoft Office Excel Helpers
use crate::error::ResultMessage;
use crate::error::SheetError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

/// XML tag name for relationship elements in Excel files
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Opens an Excel package and loads its sheet list
///
/// # Arguments
/// * `file_name` - Name of the file, used in error messages
/// * `reader` - The package bytes
/// * `load_workbook` - Function to load the (name, zip_path) list of worksheets
///
/// # Returns
/// Tuple containing the zip archive handle and the list of sheets
pub(super) fn open<RS, W>(file_name: &str, reader: RS, load_workbook: W) -> Result<(
    ZipArchive<RS>,
    Vec<(String, String)>
), SheetError>
where
    RS: Read + Seek,
    W: Fn(&mut ZipArchive<RS>) -> Result<Vec<(String, String)>, SheetError>,
{
    let mut zip = ZipArchive::new(reader)
        .map_err(SheetError::from)
        .with_prefix(&format!("'{file_name}' is not an xlsx package"))?;
    let sheets = load_workbook(&mut zip)?;
    if sheets.is_empty() {
        Err(SpreadsheetError::SpreadsheetEmptyError(file_name.to_owned()))?
    }
    Ok((zip, sheets))
}

/// Loads worksheet relationships from an Excel file
///
/// # Arguments
/// * `zip` - Zip archive handle
/// * `path` - Path to the relationships XML file within the archive
///
/// # Returns
/// Mapping of relationship IDs to worksheet paths
pub(super) fn load_relationships<RS: Read + Seek>(zip: &mut ZipArchive<RS>, path: &str) -> Result<HashMap<String, String>, SheetError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target so it points inside the `xl/` folder of the package
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(path) = path.strip_prefix('/') {
        path.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}
