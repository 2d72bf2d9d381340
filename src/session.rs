//! # Session Module
//!
//! Application state of a single extraction session and one method per user
//! action: choosing a file, toggling columns, picking the output format,
//! previewing and downloading.
//!
//! Reading a chosen file is split into [`Session::begin_upload`] and
//! [`Session::finish_upload`] so the bytes can arrive later; only the most
//! recently started upload is applied.
use crate::dataset;
use crate::dataset::Dataset;
use crate::dataset::Preview;
use crate::dataset::Selection;
use crate::error::ExtractError;
use crate::error::SheetError;
use crate::export;
use crate::export::Export;
use crate::spreadsheet::TabularFormat;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Name and size of the chosen file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl FileInfo {
    /// Size rendered in megabytes with two decimals, e.g. `0.01 MB`
    pub fn size_megabytes(&self) -> String {
        format!("{:.2} MB", self.size as f64 / 1024.0 / 1024.0)
    }
}

/// Handle of a started upload, redeemed by [`Session::finish_upload`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct UploadTicket(u64);

#[derive(Debug, Default)]
pub struct Session {
    file: Option<FileInfo>,
    dataset: Option<Dataset>,
    selection: Selection,
    format: TabularFormat,
    error: Option<String>,
    /// Sequence number of the most recent upload
    latest_upload: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&FileInfo> {
        self.file.as_ref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Column names of the current dataset, empty when nothing is loaded
    pub fn columns(&self) -> &[String] {
        self.dataset.as_ref().map(|dataset| dataset.columns.as_slice()).unwrap_or_default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn format(&self) -> TabularFormat {
        self.format
    }

    /// The message of the last failed action, cleared by the next upload or download
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts reading a chosen file.
    ///
    /// The extension is checked before any content is read. A rejected file is
    /// forgotten and its message recorded; the current dataset stays, and any
    /// upload still in flight is superseded.
    ///
    /// # Arguments
    /// * `name` - File name as chosen by the user
    /// * `size` - File size in bytes
    ///
    /// # Returns
    /// A ticket to pass to [`Session::finish_upload`] with the file content
    pub fn begin_upload(&mut self, name: &str, size: u64) -> Result<UploadTicket, ExtractError> {
        self.error = None;
        self.latest_upload += 1;
        if TabularFormat::detect(name).is_none() {
            let error = ExtractError::UnsupportedFormat { name: name.to_owned() };
            warn!(file_name = name, "rejected file with unsupported extension");
            self.file = None;
            self.error = Some(error.user_message().to_owned());
            return Err(error);
        }

        self.file = Some(FileInfo {
            name: name.to_owned(),
            size,
        });
        debug!(file_name = name, size, ticket = self.latest_upload, "upload started");
        Ok(UploadTicket(self.latest_upload))
    }

    /// Applies the content read for an upload.
    ///
    /// A ticket superseded by a later [`Session::begin_upload`] is ignored. On
    /// success the dataset is replaced and the selection cleared; on failure
    /// the message is recorded and the previous dataset kept.
    ///
    /// # Returns
    /// `Ok(true)` if the upload was applied, `Ok(false)` for a stale ticket
    pub fn finish_upload(&mut self, ticket: UploadTicket, content: io::Result<Vec<u8>>) -> Result<bool, ExtractError> {
        if ticket.0 != self.latest_upload {
            debug!(ticket = ticket.0, latest = self.latest_upload, "ignored stale upload");
            return Ok(false);
        }
        let Some(name) = self.file.as_ref().map(|file| file.name.to_owned()) else {
            debug!(ticket = ticket.0, "ignored upload without a chosen file");
            return Ok(false);
        };

        let result = content
            .map_err(|e| ExtractError::ParseError {
                name: name.to_owned(),
                source: SheetError::from(e),
            })
            .and_then(|bytes| dataset::decode(&bytes, &name));
        match result {
            Ok(dataset) => {
                info!(
                    file_name = %name,
                    columns = dataset.columns.len(),
                    rows = dataset.rows.len(),
                    "loaded file"
                );
                self.dataset = Some(dataset);
                self.selection.clear();
                Ok(true)
            }
            Err(error) => {
                warn!(file_name = %name, %error, "failed to load file");
                self.error = Some(error.user_message().to_owned());
                Err(error)
            }
        }
    }

    /// Chooses a file whose content is already in memory.
    pub fn upload(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), ExtractError> {
        let ticket = self.begin_upload(name, bytes.len() as u64)?;
        self.finish_upload(ticket, Ok(bytes))?;
        Ok(())
    }

    /// Chooses a file from disk; the file name part of `path` is the upload name.
    pub fn open_path(&mut self, path: &Path) -> Result<(), ExtractError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let size = fs::metadata(path).map(|metadata| metadata.len()).unwrap_or(0);
        let ticket = self.begin_upload(&name, size)?;
        self.finish_upload(ticket, fs::read(path))?;
        Ok(())
    }

    /// Selects or deselects a column of the current dataset.
    ///
    /// # Returns
    /// `true` if the column is selected afterwards; unknown columns are ignored
    pub fn toggle_column(&mut self, column: &str) -> bool {
        match &self.dataset {
            Some(dataset) if dataset.has_column(column) => self.selection.toggle(column),
            _ => {
                debug!(column, "ignored toggle of unknown column");
                false
            }
        }
    }

    pub fn set_format(&mut self, format: TabularFormat) {
        self.format = format;
    }

    /// Returns true when at least one column is selected
    pub fn can_download(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The first rows of the dataset in the selected columns, if a dataset is loaded
    pub fn preview(&self) -> Option<Preview> {
        self.dataset.as_ref().map(|dataset| Preview::new(dataset, &self.selection))
    }

    /// Projects the full dataset onto the selection and encodes it in the current format.
    pub fn download(&mut self) -> Result<Export, ExtractError> {
        let empty = Dataset::default();
        let dataset = self.dataset.as_ref().unwrap_or(&empty);
        let base_name = self.file.as_ref().map(|file| file.name.as_str());
        let result = export::project(dataset, &self.selection)
            .and_then(|rows| export::encode(&rows, self.format, base_name));
        match result {
            Ok(export) => {
                info!(file_name = %export.file_name, size = export.bytes.len(), "prepared download");
                self.error = None;
                Ok(export)
            }
            Err(error) => {
                warn!(%error, "download failed");
                self.error = Some(error.user_message().to_owned());
                Err(error)
            }
        }
    }
}
