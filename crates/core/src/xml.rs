//! Minimal XML emitter shared by the container writers.

use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Streams XML events into an in-memory buffer.
///
/// Attribute values and text are escaped.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            inner: Writer::new(Vec::with_capacity(4096)),
        }
    }

    /// Start a document with a standalone UTF-8 declaration.
    pub fn document() -> Result<Self> {
        let mut xml = Self::new();
        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(xml)
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.event(Event::Start(element(name, attrs)))?;
        Ok(self)
    }

    pub fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.event(Event::Empty(element(name, attrs)))?;
        Ok(self)
    }

    pub fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.event(Event::Text(BytesText::new(text)))?;
        Ok(self)
    }

    /// `<name attrs>text</name>`
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<&mut Self> {
        self.start(name, attrs)?.text(text)?.end(name)
    }

    pub fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::Serialization(format!("XML write failed: {}", e)))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attrs {
        start.push_attribute((key, value));
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_nested_elements() {
        let mut xml = XmlWriter::document().unwrap();
        xml.start("root", &[("id", "1")])
            .unwrap()
            .empty("leaf", &[("a", "x")])
            .unwrap()
            .text_element("t", &[], "hello")
            .unwrap()
            .end("root")
            .unwrap();

        let out = String::from_utf8(xml.finish()).unwrap();
        assert_eq!(
            out,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><root id="1"><leaf a="x"/><t>hello</t></root>"#
        );
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut xml = XmlWriter::new();
        xml.text_element("t", &[("title", "a\"b")], "x < y & z").unwrap();

        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.contains("x &lt; y &amp; z"));
        assert!(out.contains("a&quot;b"));
    }
}
