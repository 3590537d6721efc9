//! Writer interface and registry.

use crate::error::{Error, Result};
use crate::format::WriterFormat;
use crate::model::Document;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::{Seek, Write};

/// Output sink for writers. Container formats need to seek.
pub trait WriteSeek: Write + Seek {}

impl<T: Write + Seek + ?Sized> WriteSeek for T {}

/// Encodes a built document in one format.
pub trait DocumentWriter {
    /// Format produced by this writer.
    fn format(&self) -> WriterFormat;

    /// Write the whole document to `out`.
    fn write(&self, document: &Document, out: &mut dyn WriteSeek) -> Result<()>;
}

/// Writers keyed by format.
pub struct WriterRegistry {
    writers: HashMap<WriterFormat, Box<dyn DocumentWriter>>,
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterRegistry {
    /// Registry with the built-in [`SerializedWriter`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(SerializedWriter::new());
        registry
    }

    /// Registry without any writer.
    pub fn empty() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    /// Register a writer, replacing any writer for the same format.
    pub fn register<W: DocumentWriter + 'static>(&mut self, writer: W) -> &mut Self {
        log::debug!("registered writer for {}", writer.format());
        self.writers.insert(writer.format(), Box::new(writer));
        self
    }

    pub fn with<W: DocumentWriter + 'static>(mut self, writer: W) -> Self {
        self.register(writer);
        self
    }

    pub fn get(&self, format: WriterFormat) -> Result<&dyn DocumentWriter> {
        self.writers
            .get(&format)
            .map(|w| &**w)
            .ok_or_else(|| Error::UnsupportedFormat(format!("no writer registered for {}", format)))
    }

    pub fn contains(&self, format: WriterFormat) -> bool {
        self.writers.contains_key(&format)
    }

    /// Registered formats in canonical order.
    pub fn formats(&self) -> Vec<WriterFormat> {
        WriterFormat::ALL
            .into_iter()
            .filter(|f| self.contains(*f))
            .collect()
    }
}

impl fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

/// Envelope of the serialized format.
#[derive(Serialize)]
struct SerializedDocument<'a> {
    format: &'static str,
    version: u32,
    document: &'a Document,
}

/// Writes the object graph as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedWriter;

impl SerializedWriter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentWriter for SerializedWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::Serialized
    }

    fn write(&self, document: &Document, out: &mut dyn WriteSeek) -> Result<()> {
        let envelope = SerializedDocument {
            format: "deck",
            version: 1,
            document,
        };
        serde_json::to_writer_pretty(&mut *out, &envelope)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        out.flush()?;
        Ok(())
    }
}
