//! OpenDocument presentation writer implementation.

use crate::styles::{self, cm, px_cm, ShapeStyles};
use chrono::DateTime;
use deck_core::writer::{DocumentWriter, WriteSeek};
use deck_core::xml::XmlWriter;
use deck_core::{Document, Error, Result, Shape, Slide, WriterFormat};
use std::io::Write;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const MIMETYPE: &str = "application/vnd.oasis.opendocument.presentation";
const ODF_VERSION: &str = "1.2";

const NS_OFFICE: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const NS_STYLE: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";
const NS_TEXT: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
const NS_DRAW: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";
const NS_FO: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";
const NS_SVG: &str = "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0";
const NS_PRESENTATION: &str = "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0";
const NS_META: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";
const NS_MANIFEST: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";
const NS_XLINK: &str = "http://www.w3.org/1999/xlink";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";

const MASTER_PAGE: &str = "Default";

/// Writer for OpenDocument presentation packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct OdpWriter;

impl OdpWriter {
    /// Create a new ODP writer.
    pub fn new() -> Self {
        Self
    }

    fn add_part<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        name: &str,
        bytes: &[u8],
        method: CompressionMethod,
    ) -> Result<()> {
        let options = FileOptions::default().compression_method(method);
        zip.start_file(name, options)
            .map_err(|e| Error::Serialization(format!("ZIP error: {}", e)))?;
        zip.write_all(bytes)?;
        Ok(())
    }

    fn manifest_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::document()?;
        xml.start(
            "manifest:manifest",
            &[("xmlns:manifest", NS_MANIFEST), ("manifest:version", ODF_VERSION)],
        )?;
        xml.empty(
            "manifest:file-entry",
            &[
                ("manifest:full-path", "/"),
                ("manifest:version", ODF_VERSION),
                ("manifest:media-type", MIMETYPE),
            ],
        )?;
        for part in ["content.xml", "styles.xml", "meta.xml"] {
            xml.empty(
                "manifest:file-entry",
                &[("manifest:full-path", part), ("manifest:media-type", "text/xml")],
            )?;
        }
        xml.end("manifest:manifest")?;
        Ok(xml.finish())
    }

    fn meta_xml(&self, document: &Document) -> Result<Vec<u8>> {
        let props = document.properties();
        let created = iso_datetime(props.created);
        let modified = iso_datetime(props.modified);

        let mut xml = XmlWriter::document()?;
        xml.start(
            "office:document-meta",
            &[
                ("xmlns:office", NS_OFFICE),
                ("xmlns:meta", NS_META),
                ("xmlns:dc", NS_DC),
                ("office:version", ODF_VERSION),
            ],
        )?;
        xml.start("office:meta", &[])?;
        xml.text_element("meta:generator", &[], "deck")?;
        xml.text_element("dc:title", &[], &props.title)?;
        xml.text_element("dc:description", &[], &props.description)?;
        xml.text_element("dc:subject", &[], &props.subject)?;
        if !props.keywords.is_empty() {
            xml.text_element("meta:keyword", &[], &props.keywords)?;
        }
        xml.text_element("meta:initial-creator", &[], &props.creator)?;
        xml.text_element("dc:creator", &[], &props.last_modified_by)?;
        xml.text_element("meta:creation-date", &[], &created)?;
        xml.text_element("dc:date", &[], &modified)?;
        if !props.category.is_empty() {
            xml.text_element(
                "meta:user-defined",
                &[("meta:name", "Category")],
                &props.category,
            )?;
        }
        if !props.company.is_empty() {
            xml.text_element("meta:user-defined", &[("meta:name", "Company")], &props.company)?;
        }
        xml.end("office:meta")?.end("office:document-meta")?;
        Ok(xml.finish())
    }

    /// Page layout and the single master page.
    fn styles_xml(&self, document: &Document) -> Result<Vec<u8>> {
        let layout = document.layout();
        let width = cm(layout.cx_emu());
        let height = cm(layout.cy_emu());
        let orientation = if layout.cx_emu() >= layout.cy_emu() {
            "landscape"
        } else {
            "portrait"
        };

        let mut xml = XmlWriter::document()?;
        xml.start(
            "office:document-styles",
            &[
                ("xmlns:office", NS_OFFICE),
                ("xmlns:style", NS_STYLE),
                ("xmlns:draw", NS_DRAW),
                ("xmlns:fo", NS_FO),
                ("office:version", ODF_VERSION),
            ],
        )?;
        xml.start("office:automatic-styles", &[])?
            .start("style:page-layout", &[("style:name", "PM1")])?
            .empty(
                "style:page-layout-properties",
                &[
                    ("fo:margin-top", "0cm"),
                    ("fo:margin-bottom", "0cm"),
                    ("fo:margin-left", "0cm"),
                    ("fo:margin-right", "0cm"),
                    ("fo:page-width", width.as_str()),
                    ("fo:page-height", height.as_str()),
                    ("style:print-orientation", orientation),
                ],
            )?
            .end("style:page-layout")?
            .end("office:automatic-styles")?;
        xml.start("office:master-styles", &[])?
            .empty(
                "style:master-page",
                &[("style:name", MASTER_PAGE), ("style:page-layout-name", "PM1")],
            )?
            .end("office:master-styles")?;
        xml.end("office:document-styles")?;
        Ok(xml.finish())
    }

    fn content_xml(&self, document: &Document) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::document()?;
        xml.start(
            "office:document-content",
            &[
                ("xmlns:office", NS_OFFICE),
                ("xmlns:style", NS_STYLE),
                ("xmlns:text", NS_TEXT),
                ("xmlns:draw", NS_DRAW),
                ("xmlns:fo", NS_FO),
                ("xmlns:svg", NS_SVG),
                ("xmlns:xlink", NS_XLINK),
                ("xmlns:presentation", NS_PRESENTATION),
                ("office:version", ODF_VERSION),
            ],
        )?;

        // Styles are numbered across the whole document in shape order.
        xml.start("office:automatic-styles", &[])?;
        let mut counter = 0;
        for slide in document.slides() {
            for shape in &slide.shapes {
                counter += 1;
                let names = ShapeStyles::numbered(counter);
                styles::write_graphic_style(&mut xml, &names.graphic, shape)?;
                styles::write_paragraph_style(&mut xml, &names.paragraph, shape.alignment)?;
                if let Some(text) = shape.text() {
                    styles::write_text_style(&mut xml, &names.text, &text.font)?;
                }
            }
        }
        xml.end("office:automatic-styles")?;

        xml.start("office:body", &[])?.start("office:presentation", &[])?;
        let mut counter = 0;
        for (index, slide) in document.slides().iter().enumerate() {
            self.write_page(&mut xml, slide, index + 1, &mut counter)?;
        }
        xml.end("office:presentation")?.end("office:body")?;
        xml.end("office:document-content")?;
        Ok(xml.finish())
    }

    fn write_page(
        &self,
        xml: &mut XmlWriter,
        slide: &Slide,
        number: usize,
        counter: &mut usize,
    ) -> Result<()> {
        let name = slide
            .name
            .clone()
            .unwrap_or_else(|| format!("page{}", number));
        xml.start(
            "draw:page",
            &[("draw:name", name.as_str()), ("draw:master-page-name", MASTER_PAGE)],
        )?;
        for shape in &slide.shapes {
            *counter += 1;
            self.write_frame(xml, shape, &ShapeStyles::numbered(*counter))?;
        }
        xml.end("draw:page")?;
        Ok(())
    }

    fn write_frame(&self, xml: &mut XmlWriter, shape: &Shape, names: &ShapeStyles) -> Result<()> {
        let width = px_cm(shape.width as f64);
        let height = px_cm(shape.height as f64);
        let x = px_cm(shape.offset_x as f64);
        let y = px_cm(shape.offset_y as f64);
        let transform = rotation_transform(shape);

        let mut attrs = vec![
            ("draw:style-name", names.graphic.as_str()),
            ("svg:width", width.as_str()),
            ("svg:height", height.as_str()),
        ];
        if !shape.name.is_empty() {
            attrs.push(("draw:name", shape.name.as_str()));
        }
        match &transform {
            Some(transform) => attrs.push(("draw:transform", transform.as_str())),
            None => {
                attrs.push(("svg:x", x.as_str()));
                attrs.push(("svg:y", y.as_str()));
            }
        }

        xml.start("draw:frame", &attrs)?;
        xml.start("draw:text-box", &[])?;
        xml.start("text:p", &[("text:style-name", names.paragraph.as_str())])?;
        if let Some(text) = shape.text() {
            if let Some(url) = &shape.hyperlink {
                xml.start("text:a", &[("xlink:type", "simple"), ("xlink:href", url.as_str())])?;
            }
            xml.text_element(
                "text:span",
                &[("text:style-name", names.text.as_str())],
                &text.content,
            )?;
            if shape.hyperlink.is_some() {
                xml.end("text:a")?;
            }
        }
        xml.end("text:p")?;
        xml.end("draw:text-box")?;
        if !shape.description.is_empty() {
            xml.text_element("svg:desc", &[], &shape.description)?;
        }
        xml.end("draw:frame")?;
        Ok(())
    }
}

/// `draw:transform` turning the frame clockwise about its centre.
fn rotation_transform(shape: &Shape) -> Option<String> {
    if shape.rotation == 0.0 {
        return None;
    }
    // ODF angles run counter-clockwise.
    let angle = -shape.rotation.to_radians();
    let (sin, cos) = angle.sin_cos();
    let half_w = shape.width as f64 / 2.0;
    let half_h = shape.height as f64 / 2.0;
    let tx = shape.offset_x as f64 + half_w - (half_w * cos + half_h * sin);
    let ty = shape.offset_y as f64 + half_h - (half_h * cos - half_w * sin);
    Some(format!(
        "rotate ({:.6}) translate ({} {})",
        angle,
        px_cm(tx),
        px_cm(ty)
    ))
}

fn iso_datetime(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .unwrap_or_default()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

impl DocumentWriter for OdpWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::ODPresentation
    }

    fn write(&self, document: &Document, out: &mut dyn WriteSeek) -> Result<()> {
        let mut zip = ZipWriter::new(out);

        // The mimetype entry must come first and stay uncompressed.
        self.add_part(&mut zip, "mimetype", MIMETYPE.as_bytes(), CompressionMethod::Stored)?;
        let deflated = CompressionMethod::Deflated;
        self.add_part(&mut zip, "META-INF/manifest.xml", &self.manifest_xml()?, deflated)?;
        self.add_part(&mut zip, "meta.xml", &self.meta_xml(document)?, deflated)?;
        self.add_part(&mut zip, "styles.xml", &self.styles_xml(document)?, deflated)?;
        self.add_part(&mut zip, "content.xml", &self.content_xml(document)?, deflated)?;

        zip.finish()
            .map_err(|e| Error::Serialization(format!("ZIP error: {}", e)))?;
        log::debug!("wrote ODP package with {} slide(s)", document.slide_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Presentation, PresentationConfig, SendOptions, WriterRegistry};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn sample_config() -> PresentationConfig {
        PresentationConfig::from_json(
            r#"{
                "document": {"title": "Roadmap", "creator": "Planning", "company": "ACME"},
                "layout": "A4",
                "slides": [
                    {"name": "Goals", "content": [
                        {"text": {"content": "Ship <it>", "font": {"italic": true, "color": "0000FF"}},
                         "width": 400, "height": 100, "hyperlink": "https://example.com/goals",
                         "description": "Main goal"}
                    ]},
                    {"content": [{"text": 42, "rotation": 90, "width": 200, "height": 100}]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn package(config: PresentationConfig) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut presentation = Presentation::new(config);
        presentation.render().unwrap();
        let mut out = Cursor::new(Vec::new());
        OdpWriter::new()
            .write(presentation.document(), &mut out)
            .unwrap();
        ZipArchive::new(Cursor::new(out.into_inner())).unwrap()
    }

    fn read_part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let mut archive = package(sample_config());
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "mimetype");
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        drop(entry);
        assert_eq!(read_part(&mut archive, "mimetype"), MIMETYPE);
    }

    #[test]
    fn test_manifest_lists_parts() {
        let mut archive = package(sample_config());
        let manifest = read_part(&mut archive, "META-INF/manifest.xml");
        for part in ["content.xml", "styles.xml", "meta.xml"] {
            assert!(manifest.contains(part), "manifest misses {}", part);
        }
    }

    #[test]
    fn test_pages_and_text() {
        let mut archive = package(sample_config());
        let content = read_part(&mut archive, "content.xml");

        assert!(content.contains(r#"<draw:page draw:name="Goals""#));
        assert!(content.contains(r#"<draw:page draw:name="page2""#));
        assert!(content.contains("Ship &lt;it&gt;"));
        assert!(content.contains(r#"xlink:href="https://example.com/goals""#));
        assert!(content.contains("<svg:desc>Main goal</svg:desc>"));
        assert!(content.contains(r#"fo:font-style="italic""#));
        assert!(content.contains(r##"fo:color="#0000ff""##));
        assert!(content.contains(">42</text:span>"));
        assert!(content.contains("draw:transform=\"rotate (-1.570796)"));
    }

    #[test]
    fn test_page_size_from_layout() {
        let mut archive = package(sample_config());
        let styles = read_part(&mut archive, "styles.xml");
        assert!(styles.contains(r#"fo:page-width="29.700cm""#));
        assert!(styles.contains(r#"fo:page-height="21.000cm""#));
        assert!(styles.contains(r#"style:print-orientation="landscape""#));
    }

    #[test]
    fn test_meta_properties() {
        let mut archive = package(sample_config());
        let meta = read_part(&mut archive, "meta.xml");
        assert!(meta.contains("<dc:title>Roadmap</dc:title>"));
        assert!(meta.contains("<meta:initial-creator>Planning</meta:initial-creator>"));
        assert!(meta.contains(r#"<meta:user-defined meta:name="Company">ACME</meta:user-defined>"#));
    }

    #[test]
    fn test_rotation_keeps_centre() {
        let mut shape = Shape::default();
        shape.width = 200;
        shape.height = 100;
        shape.rotation = 180.0;
        // Half a turn about the centre puts the origin at the far corner.
        let transform = rotation_transform(&shape).unwrap();
        assert!(transform.ends_with(&format!("translate ({} {})", px_cm(200.0), px_cm(100.0))));
        assert!(rotation_transform(&Shape::default()).is_none());
    }

    #[test]
    fn test_send_infers_odp_from_name() {
        let mut presentation = Presentation::new(sample_config())
            .with_writers(WriterRegistry::new().with(OdpWriter::new()));
        let attachment = presentation
            .send("roadmap.odp", SendOptions::default())
            .unwrap();

        assert_eq!(attachment.mime_type(), MIMETYPE);
        let bytes = attachment.into_bytes().unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }
}
