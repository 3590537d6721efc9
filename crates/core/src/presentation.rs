//! Presentation component: configuration in, saved or streamed file out.
//!
//! The document is created on first access and built once. `save` and `send`
//! build it only when that has not happened yet, so repeated output calls
//! reuse the same graph.

use crate::builder::DocumentBuilder;
use crate::config::PresentationConfig;
use crate::error::{Error, Result};
use crate::format::WriterFormat;
use crate::formatter::Formatter;
use crate::model::Document;
use crate::writer::{DocumentWriter, WriterRegistry};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Builds a document from configuration and writes it out.
#[derive(Debug)]
pub struct Presentation {
    config: PresentationConfig,
    /// Text shown on slides without content; empty disables it.
    empty_slide: String,
    /// `None` uses the default format for `save` and the attachment
    /// extension for `send`.
    writer_format: Option<WriterFormat>,
    formatter: Formatter,
    writers: WriterRegistry,
    document: Option<Document>,
    rendered: bool,
}

impl Presentation {
    /// A presentation over `config` with only the built-in
    /// [`SerializedWriter`](crate::SerializedWriter) registered.
    ///
    /// The default output format is `PowerPoint2007`, so register the PPTX and
    /// ODP writers from `deck-pptx` and `deck-odp` through
    /// [`with_writers`](Self::with_writers) before saving in those formats.
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            config,
            empty_slide: String::new(),
            writer_format: None,
            formatter: Formatter::default(),
            writers: WriterRegistry::new(),
            document: None,
            rendered: false,
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_writer_format(mut self, format: WriterFormat) -> Self {
        self.writer_format = Some(format);
        self
    }

    pub fn with_writers(mut self, writers: WriterRegistry) -> Self {
        self.writers = writers;
        self
    }

    pub fn with_empty_slide(mut self, text: impl Into<String>) -> Self {
        self.empty_slide = text.into();
        self
    }

    /// Replace the configuration tree.
    ///
    /// Any document built from the previous configuration is discarded.
    pub fn configure(&mut self, config: PresentationConfig) -> &mut Self {
        self.config = config;
        self.document = None;
        self.rendered = false;
        self
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn writer_format(&self) -> Option<WriterFormat> {
        self.writer_format
    }

    pub fn writers_mut(&mut self) -> &mut WriterRegistry {
        &mut self.writers
    }

    /// The document, created empty on first access.
    pub fn document(&mut self) -> &mut Document {
        self.document.get_or_insert_with(Document::new)
    }

    /// Use `document` as the build target. It counts as not yet rendered.
    pub fn set_document(&mut self, document: Document) -> &mut Self {
        self.document = Some(document);
        self.rendered = false;
        self
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Build the document from the configuration.
    ///
    /// This always walks the configuration. Calling it again after a
    /// successful build appends the configured slides a second time; output
    /// methods check [`is_rendered`](Self::is_rendered) first and never do.
    pub fn render(&mut self) -> Result<&mut Self> {
        let document = self.document.get_or_insert_with(Document::new);
        let mut builder = DocumentBuilder::new(document, &self.formatter);
        if !self.empty_slide.is_empty() {
            builder = builder.with_empty_slide(&self.empty_slide);
        }
        builder.build(&self.config)?;
        self.rendered = true;
        Ok(self)
    }

    /// Write the document to `path`, creating parent directories.
    ///
    /// The file is written next to its destination and moved into place
    /// once complete, so a failed write leaves nothing at `path`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.ensure_rendered()?;

        let format = self.writer_format.unwrap_or_default();
        let writer = self.writers.get(format)?;
        let document = built(&self.document)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        write_to(writer, document, staged.as_file_mut())?;
        staged.persist(path).map_err(|e| Error::Io(e.error))?;

        log::info!("saved {} as {}", path.display(), format);
        Ok(())
    }

    /// Write the document to a temporary file and hand it out as an
    /// attachment named `attachment_name`.
    ///
    /// Without a configured writer format, the format is taken from the
    /// attachment's extension. The temporary file has no name on disk and
    /// is released when the attachment is dropped.
    pub fn send(&mut self, attachment_name: &str, options: SendOptions) -> Result<Attachment> {
        self.ensure_rendered()?;

        let format = match self.writer_format {
            Some(format) => format,
            None => WriterFormat::from_file_name(attachment_name)?,
        };
        let writer = self.writers.get(format)?;
        let document = built(&self.document)?;

        let mut body = tempfile::tempfile().map_err(|e| {
            Error::ResourceUnavailable(format!("unable to create temporary file: {}", e))
        })?;
        write_to(writer, document, &mut body)?;
        let size = body.seek(SeekFrom::End(0))?;
        body.rewind()?;

        log::debug!("prepared attachment {} ({} bytes)", attachment_name, size);
        Ok(Attachment {
            file_name: attachment_name.to_string(),
            mime_type: options
                .mime_type
                .unwrap_or_else(|| format.mime_type().to_string()),
            inline: options.inline,
            size,
            body,
        })
    }

    fn ensure_rendered(&mut self) -> Result<()> {
        if !self.rendered {
            self.render()?;
        }
        Ok(())
    }
}

fn built(document: &Option<Document>) -> Result<&Document> {
    document
        .as_ref()
        .ok_or_else(|| Error::InvalidState("document has not been built".to_string()))
}

fn write_to(writer: &dyn DocumentWriter, document: &Document, file: &mut File) -> Result<()> {
    let mut out = BufWriter::new(file);
    writer.write(document, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Options for [`Presentation::send`].
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Overrides the format's MIME type.
    pub mime_type: Option<String>,
    /// Ask the client to display rather than download.
    pub inline: bool,
}

/// A written document ready to be streamed to a client.
#[derive(Debug)]
pub struct Attachment {
    file_name: String,
    mime_type: String,
    inline: bool,
    size: u64,
    body: File,
}

impl Attachment {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        let disposition = if self.inline { "inline" } else { "attachment" };
        let escaped = self.file_name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{}; filename=\"{}\"", disposition, escaped)
    }

    /// Read the whole body.
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.size as usize);
        self.body.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Copy the body to a file at `path`.
    pub fn persist_to(mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path)?;
        io::copy(&mut self.body, &mut file)?;
        Ok(path)
    }
}

impl Read for Attachment {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentConfig, SlideConfig};
    use crate::writer::WriteSeek;

    fn two_slides() -> PresentationConfig {
        PresentationConfig::default()
            .with_slide(SlideConfig::named("a").with_content(ContentConfig::new("first")))
            .with_slide(SlideConfig::named("b").with_content(ContentConfig::new("second")))
    }

    fn json_presentation() -> Presentation {
        Presentation::new(two_slides()).with_writer_format(WriterFormat::Serialized)
    }

    /// Writes some bytes, then fails.
    struct BrokenWriter;

    impl DocumentWriter for BrokenWriter {
        fn format(&self) -> WriterFormat {
            WriterFormat::PowerPoint2007
        }

        fn write(&self, _document: &Document, out: &mut dyn WriteSeek) -> Result<()> {
            out.write_all(b"partial")?;
            Err(Error::Serialization("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_document_created_lazily() {
        let mut presentation = Presentation::new(PresentationConfig::default());
        assert!(!presentation.is_rendered());
        assert_eq!(presentation.document().slide_count(), 1);
    }

    #[test]
    fn test_render_sets_flag() {
        let mut presentation = json_presentation();
        presentation.render().unwrap();
        assert!(presentation.is_rendered());
        assert_eq!(presentation.document().slide_count(), 2);
    }

    #[test]
    fn test_render_twice_duplicates_slides() {
        let mut presentation = json_presentation();
        presentation.render().unwrap().render().unwrap();

        let document = presentation.document();
        let names: Vec<_> = document.slides().iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec![Some("a"), Some("b"), Some("a"), Some("b")]);
        assert!(document.slides().iter().all(|s| s.shapes.len() == 1));
    }

    #[test]
    fn test_failed_render_leaves_flag_unset() {
        let config = PresentationConfig::default().with_slide(
            SlideConfig::new().with_content(ContentConfig::new("x").with_property("glorp", 1)),
        );
        let mut presentation = Presentation::new(config);
        assert!(matches!(
            presentation.render(),
            Err(Error::UnsupportedProperty { .. })
        ));
        assert!(!presentation.is_rendered());
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/deck.json");

        let mut presentation = json_presentation();
        presentation.save(&path).unwrap();

        let written = fs::read(&path).unwrap();
        assert!(!written.is_empty());
        let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(value["document"]["slides"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_save_twice_does_not_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = json_presentation();

        presentation.save(dir.path().join("one.json")).unwrap();
        presentation.save(dir.path().join("two.json")).unwrap();

        assert!(presentation.is_rendered());
        assert_eq!(presentation.document().slide_count(), 2);
    }

    #[test]
    fn test_save_defaults_to_powerpoint_without_registered_writer() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = Presentation::new(two_slides());
        let err = presentation.save(dir.path().join("deck.pptx")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref m) if m.contains("PowerPoint2007")));
    }

    #[test]
    fn test_failed_save_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let mut presentation =
            Presentation::new(two_slides()).with_writers(WriterRegistry::empty().with(BrokenWriter));

        assert!(matches!(
            presentation.save(&path),
            Err(Error::Serialization(_))
        ));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_failure_in_build_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/deck.json");
        let config = PresentationConfig::default()
            .with_slide(SlideConfig::new().with_content(ContentConfig::default()));
        let mut presentation =
            Presentation::new(config).with_writer_format(WriterFormat::Serialized);

        assert!(matches!(
            presentation.save(&path),
            Err(Error::MissingRequiredField(_))
        ));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_send_infers_format_from_extension() {
        let mut presentation = Presentation::new(two_slides());
        let attachment = presentation.send("Deck.JSON", SendOptions::default()).unwrap();

        assert_eq!(attachment.file_name(), "Deck.JSON");
        assert_eq!(attachment.mime_type(), "application/json");
        assert_eq!(
            attachment.content_disposition(),
            "attachment; filename=\"Deck.JSON\""
        );
        assert!(attachment.size() > 0);

        let size = attachment.size();
        let bytes = attachment.into_bytes().unwrap();
        assert_eq!(bytes.len() as u64, size);
    }

    #[test]
    fn test_send_options() {
        let mut presentation = json_presentation();
        let options = SendOptions {
            mime_type: Some("text/plain".to_string()),
            inline: true,
        };
        let attachment = presentation.send("say \"hi\".json", options).unwrap();
        assert_eq!(attachment.mime_type(), "text/plain");
        assert_eq!(
            attachment.content_disposition(),
            "inline; filename=\"say \\\"hi\\\".json\""
        );
    }

    #[test]
    fn test_send_unknown_extension() {
        let mut presentation = Presentation::new(two_slides());
        assert!(matches!(
            presentation.send("deck.key", SendOptions::default()),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_send_does_not_rebuild_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut presentation = json_presentation();
        presentation.save(dir.path().join("deck.json")).unwrap();
        presentation.send("deck.json", SendOptions::default()).unwrap();
        assert_eq!(presentation.document().slide_count(), 2);
    }

    #[test]
    fn test_configure_discards_built_document() {
        let mut presentation = json_presentation();
        presentation.render().unwrap();

        presentation.configure(PresentationConfig::default().with_slide(SlideConfig::named("only")));
        assert!(!presentation.is_rendered());

        let dir = tempfile::tempdir().unwrap();
        presentation.save(dir.path().join("deck.json")).unwrap();
        assert_eq!(presentation.document().slide_count(), 1);
        assert_eq!(presentation.document().slides()[0].name.as_deref(), Some("only"));
    }

    #[test]
    fn test_empty_slide_text() {
        let config = PresentationConfig::default().with_slide(SlideConfig::named("blank"));
        let mut presentation = Presentation::new(config).with_empty_slide("(empty)");
        presentation.render().unwrap();

        let slide = &presentation.document().slides()[0];
        assert_eq!(slide.shapes[0].text().unwrap().content, "(empty)");
    }
}
