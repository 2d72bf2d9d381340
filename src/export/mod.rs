//! # Export Module
//!
//! Projects a [`Dataset`] onto the selected columns and encodes the result as
//! an xlsx workbook or comma-separated text, ready to be saved as
//! `filtered_<base>.<ext>`.
use crate::dataset::Dataset;
use crate::dataset::Row;
use crate::dataset::Selection;
use crate::error::ExtractError;
use crate::spreadsheet::TabularFormat;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;

mod csv_writer;
mod xlsx_writer;

/// Name of the only sheet in an exported workbook
pub const SHEET_NAME: &str = "Filtered Data";

/// Base name used when the source file name is unknown
pub const FALLBACK_BASE_NAME: &str = "data";

/// Rows reduced to the selected columns, in selection order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowSequence {
    /// Column names in selection order
    pub columns: Vec<String>,
    /// Projected rows, each holding exactly the selected columns
    pub rows: Vec<Row>,
}

/// An encoded file ready to be handed to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Writes the file into `directory` under its file name.
    ///
    /// # Returns
    /// The path of the written file
    pub fn save_to(&self, directory: &Path) -> io::Result<PathBuf> {
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), size = self.bytes.len(), "saved export");
        Ok(path)
    }
}

/// Reduces every row of the dataset to the selected columns.
///
/// Values are looked up in the dataset rows; a column a row lacks reads as
/// empty. Row order is preserved.
///
/// # Returns
/// The projected rows, or `NoColumnsSelected` for an empty selection
pub fn project(dataset: &Dataset, selection: &Selection) -> Result<RowSequence, ExtractError> {
    if selection.is_empty() {
        return Err(ExtractError::NoColumnsSelected);
    }
    let rows = dataset.rows
        .iter()
        .map(|row| {
            selection
                .iter()
                .map(|column| (column, row.value(column).clone()))
                .collect()
        })
        .collect();
    Ok(RowSequence {
        columns: selection.columns().to_vec(),
        rows,
    })
}

/// Serializes projected rows in the requested format.
///
/// # Arguments
/// * `rows` - The projected rows
/// * `format` - Output format
/// * `base_name` - Name of the source file, if known; used for the output name
///
/// # Returns
/// The encoded file, or `EncodeError`
pub fn encode(rows: &RowSequence, format: TabularFormat, base_name: Option<&str>) -> Result<Export, ExtractError> {
    let file_name = output_file_name(base_name, format);
    let bytes = match format {
        TabularFormat::Xlsx => xlsx_writer::write(rows, SHEET_NAME),
        TabularFormat::Csv => csv_writer::write(rows),
    }.map_err(|source| ExtractError::EncodeError {
        name: file_name.to_owned(),
        source,
    })?;

    debug!(file_name, %format, rows = rows.rows.len(), size = bytes.len(), "encoded export");
    Ok(Export {
        file_name,
        content_type: format.content_type(),
        bytes,
    })
}

/// Builds `filtered_<base>.<ext>`, where `<base>` is the source name without
/// its last extension.
pub fn output_file_name(source_name: Option<&str>, format: TabularFormat) -> String {
    let base = source_name
        .map(strip_extension)
        .filter(|base| !base.is_empty())
        .unwrap_or(FALLBACK_BASE_NAME);
    format!("filtered_{}.{}", base, format.extension())
}

/// Drops a trailing `.<ext>`, where `<ext>` is non-empty and holds no `/`.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}
