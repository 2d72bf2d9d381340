//! XML utilities for the SpreadsheetML parts of an xlsx package.
//! Provides a reader wrapper with attribute/text helper traits, and a small writer wrapper.

use crate::error::SheetError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),

    #[error("Parse attribute value '{0}' failed")]
    ParseAttributeValueError(String),
}

/// XML reader wrapper configured for spreadsheet parsing
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    /// Creates a new XML reader. Empty elements are expanded into start/end pairs
    /// so `<c r="A1"/>` is seen the same way as `<c r="A1"></c>`.
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Reads the next XML event from the reader
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, SheetError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(SheetError::XmlError(error)),
        }
    }
}

/// Helper trait for XML attributes providing convenient value extraction and parsing
pub(crate) trait XmlAttributeHelper<'a> {
    /// Gets the unescaped attribute value as a string
    fn get_value(&self) -> Result<Cow<'a, str>, SheetError>;

    /// Parses the attribute value to the specified type
    fn parse_value<T: FromStr>(&self) -> Result<T, SheetError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, SheetError> {
        Ok(self.unescape_value()?)
    }

    fn parse_value<T: FromStr>(&self) -> Result<T, SheetError> {
        self.get_value()?
            .parse()
            .map_err(|_| match std::str::from_utf8(&self.value) {
                Ok(value) => SheetError::XmlHelperError(XmlError::ParseAttributeValueError(value.to_string())),
                Err(error) => SheetError::StringEncodingError(error),
            })
    }
}

/// Helper trait for XML nodes providing attribute access methods
pub(crate) trait XmlNodeHelper<'a> {
    /// Gets an attribute value by name
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetError>;

    /// Parses an attribute value to the specified type
    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, SheetError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.get_value())
            .transpose()
    }

    fn parse_attribute_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, SheetError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.parse_value())
            .transpose()
    }
}

/// Helper trait for building text content from XML events
pub(crate) trait XmlTextContextHelper {
    /// Appends text content from BytesText event
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), SheetError>;

    /// Appends text content from BytesRef event (handles entities and character references)
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), SheetError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_text(&mut self, text: &BytesText) -> Result<(), SheetError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), SheetError> {
        let raw = bytes.xml_content()?;
        if let Some(number) = raw.strip_prefix('#') {
            let code = if let Some(hex) = number.strip_prefix('x') {
                u32::from_str_radix(hex, 16)?
            } else {
                number.parse::<u32>()?
            };
            if let Some(character) = std::char::from_u32(code) {
                self.push(character);
            }
        } else if let Some(entity) = resolve_xml_entity(&raw) {
            self.push_str(entity);
        } else {
            Err(XmlError::ParseEntityError(raw.to_string()))?;
        }

        Ok(())
    }
}

#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}

/// XML writer wrapper that builds a standalone UTF-8 document in memory
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Creates a writer and emits the `<?xml ...?>` declaration
    pub(crate) fn new() -> Result<XmlWriter, SheetError> {
        let mut writer = Writer::new(Vec::with_capacity(4096));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(XmlWriter { writer })
    }

    /// Writes an opening tag with the given attributes
    pub(crate) fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SheetError> {
        self.writer.write_event(Event::Start(element(name, attributes)))?;
        Ok(())
    }

    /// Writes a self-closing tag with the given attributes
    pub(crate) fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), SheetError> {
        self.writer.write_event(Event::Empty(element(name, attributes)))?;
        Ok(())
    }

    /// Writes escaped text content
    pub(crate) fn text(&mut self, text: &str) -> Result<(), SheetError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Writes a closing tag
    pub(crate) fn end(&mut self, name: &str) -> Result<(), SheetError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes `<name attributes...>text</name>`
    pub(crate) fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<(), SheetError> {
        self.start(name, attributes)?;
        self.text(text)?;
        self.end(name)
    }

    /// Consumes the writer and returns the document bytes
    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_xml_events;
    use std::io::Cursor;

    fn read_text(xml: &str) -> Result<String, SheetError> {
        let mut reader = XmlReader::new(Cursor::new(xml.as_bytes()));
        let mut text = String::new();
        match_xml_events!(reader => {
            Event::Text(event) => text.push_bytes_text(&event)?,
            Event::GeneralRef(event) => text.push_bytes_ref(&event)?,
        });
        Ok(text)
    }

    #[test]
    fn resolves_references() {
        let text = read_text("<t>a &amp; b &#65;&#x42;</t>").unwrap();
        assert_eq!(text, "a & b AB");
    }

    #[test]
    fn rejects_unknown_entity() {
        assert!(read_text("<t>&bogus;</t>").is_err());
    }

    #[test]
    fn attribute_parsing() -> Result<(), SheetError> {
        let mut reader = XmlReader::new(Cursor::new(&b"<row r=\"12\" spans=\"x\"/>"[..]));
        let mut found = None;
        match_xml_events!(reader => {
            Event::Start(event) => {
                found = event.parse_attribute_value::<usize>("r")?;
                assert!(event.parse_attribute_value::<usize>("spans").is_err());
                assert!(event.get_attribute_value("missing")?.is_none());
            }
        });
        assert_eq!(found, Some(12));
        Ok(())
    }

    #[test]
    fn writer_escapes_text_and_attributes() {
        let mut writer = XmlWriter::new().unwrap();
        writer.start("sheet", &[("name", "a<b")]).unwrap();
        writer.text_element("t", &[], "x & y").unwrap();
        writer.empty("dimension", &[("ref", "A1")]).unwrap();
        writer.end("sheet").unwrap();
        let xml = String::from_utf8(writer.finish()).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sheet name="a&lt;b"><t>x &amp; y</t><dimension ref="A1"/></sheet>"#
        );
    }
}
