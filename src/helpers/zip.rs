//! ZIP archive helper utilities for the Excel (.xlsx) package format.
//! Provides lookup of parts inside an archive and an in-memory package writer.

use crate::error::SheetError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;

/// Helper trait for ZIP archive operations with specialized reader creation
pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Gets a file from the ZIP archive by name (case-insensitive, path separator agnostic)
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, SheetError>;

    /// Creates an XML reader for a file within the ZIP archive
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, SheetError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn file(&'_ mut self, name: &str) -> Result<Option<ZipFile<'_, RS>>, SheetError> {
        let pattern = name.replace('\\', "/");
        let path = self
            .file_names()
            .find(|file_name| pattern.eq_ignore_ascii_case(&file_name.replace('\\', "/")))
            .map(|file_name| file_name.to_owned());
        match path.map(|file_name| self.by_name(&file_name)).transpose() {
            Ok(Some(file)) => Ok(Some(file)),
            Ok(None) | Err(ZipError::FileNotFound) => Ok(None),
            Err(error) => Err(error)?,
        }
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, SheetError> {
        let reader = self
            .file(name)?
            .map(|file| XmlReader::new(BufReader::new(file)));
        Ok(reader)
    }
}

/// Builds a ZIP package in memory, one deflated part at a time
pub(crate) struct ZipPackage {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipPackage {
    pub(crate) fn new() -> ZipPackage {
        ZipPackage {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a part at `path` with the given content
    pub(crate) fn add(&mut self, path: &str, content: &[u8]) -> Result<(), SheetError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(path, options)?;
        self.writer.write_all(content)?;
        Ok(())
    }

    /// Writes the central directory and returns the archive bytes
    pub(crate) fn finish(self) -> Result<Vec<u8>, SheetError> {
        Ok(self.writer.finish()?.into_inner())
    }
}
