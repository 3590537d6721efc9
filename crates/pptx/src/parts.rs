//! Package parts that do not depend on slide content.

use chrono::DateTime;
use deck_core::xml::XmlWriter;
use deck_core::{DocumentProperties, Result};

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship types.
pub(crate) mod rel {
    const BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn of(kind: &str) -> String {
        format!("{}/{}", BASE, kind)
    }

    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
}

pub(crate) const THEME_XML: &str = include_str!("../resources/theme1.xml");
pub(crate) const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMaster1.xml");
pub(crate) const SLIDE_LAYOUT_XML: &str = include_str!("../resources/slideLayout1.xml");
pub(crate) const PRES_PROPS_XML: &str = include_str!("../resources/presProps.xml");
pub(crate) const VIEW_PROPS_XML: &str = include_str!("../resources/viewProps.xml");
pub(crate) const TABLE_STYLES_XML: &str = include_str!("../resources/tableStyles.xml");

/// One `<Relationship>` entry.
pub(crate) struct Relationship {
    pub id: String,
    pub kind: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn internal(id: impl Into<String>, kind: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: rel::of(kind),
            target: target.into(),
            external: false,
        }
    }

    pub fn external(id: impl Into<String>, kind: &str, target: impl Into<String>) -> Self {
        Self {
            external: true,
            ..Self::internal(id, kind, target)
        }
    }
}

/// A `.rels` part.
pub(crate) fn relationships_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::document()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    for r in rels {
        let mut attrs = vec![
            ("Id", r.id.as_str()),
            ("Type", r.kind.as_str()),
            ("Target", r.target.as_str()),
        ];
        if r.external {
            attrs.push(("TargetMode", "External"));
        }
        xml.empty("Relationship", &attrs)?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// Package-level relationships (`_rels/.rels`).
pub(crate) fn root_relationships_xml() -> Result<Vec<u8>> {
    let mut xml = XmlWriter::document()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    let office_document = rel::of("officeDocument");
    let extended = rel::of("extended-properties");
    xml.empty(
        "Relationship",
        &[("Id", "rId1"), ("Type", office_document.as_str()), ("Target", "ppt/presentation.xml")],
    )?;
    xml.empty(
        "Relationship",
        &[("Id", "rId2"), ("Type", rel::CORE_PROPERTIES), ("Target", "docProps/core.xml")],
    )?;
    xml.empty(
        "Relationship",
        &[("Id", "rId3"), ("Type", extended.as_str()), ("Target", "docProps/app.xml")],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// `[Content_Types].xml` for a package with `slide_count` slides.
pub(crate) fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    const PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";
    let overrides = [
        ("/ppt/presentation.xml", format!("{}.presentation.main+xml", PML)),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{}.slideMaster+xml", PML)),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{}.slideLayout+xml", PML)),
        ("/ppt/presProps.xml", format!("{}.presProps+xml", PML)),
        ("/ppt/viewProps.xml", format!("{}.viewProps+xml", PML)),
        ("/ppt/tableStyles.xml", format!("{}.tableStyles+xml", PML)),
        (
            "/ppt/theme/theme1.xml",
            "application/vnd.openxmlformats-officedocument.theme+xml".to_string(),
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ];

    let mut xml = XmlWriter::document()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", *part), ("ContentType", content_type.as_str())],
        )?;
    }
    let slide_type = format!("{}.slide+xml", PML);
    for number in 1..=slide_count {
        let part = format!("/ppt/slides/slide{}.xml", number);
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", slide_type.as_str())],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

fn w3c_datetime(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .unwrap_or_default()
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// `docProps/core.xml`.
pub(crate) fn core_properties_xml(props: &DocumentProperties) -> Result<Vec<u8>> {
    let created = w3c_datetime(props.created);
    let modified = w3c_datetime(props.modified);

    let mut xml = XmlWriter::document()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:creator", &[], &props.creator)?;
    xml.text_element("cp:lastModifiedBy", &[], &props.last_modified_by)?;
    xml.text_element("dc:title", &[], &props.title)?;
    xml.text_element("dc:description", &[], &props.description)?;
    xml.text_element("dc:subject", &[], &props.subject)?;
    xml.text_element("cp:keywords", &[], &props.keywords)?;
    xml.text_element("cp:category", &[], &props.category)?;
    xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    xml.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &modified)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// `docProps/app.xml`.
pub(crate) fn app_properties_xml(props: &DocumentProperties, slide_count: usize) -> Result<Vec<u8>> {
    let slides = slide_count.to_string();

    let mut xml = XmlWriter::document()?;
    xml.start(
        "Properties",
        &[
            ("xmlns", "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"),
            ("xmlns:vt", "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"),
        ],
    )?;
    xml.text_element("Application", &[], "deck")?;
    xml.text_element("Slides", &[], &slides)?;
    xml.text_element("Company", &[], &props.company)?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_w3c_datetime() {
        assert_eq!(w3c_datetime(0), "1970-01-01T00:00:00Z");
        assert_eq!(w3c_datetime(1_700_000_000), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_content_types_list_slides() {
        let xml = String::from_utf8(content_types_xml(2).unwrap()).unwrap();
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/slides/slide2.xml"));
        assert!(!xml.contains("/ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_external_relationship() {
        let rels = [Relationship::external("rId2", "hyperlink", "https://example.com/?a=1&b=2")];
        let xml = String::from_utf8(relationships_xml(&rels).unwrap()).unwrap();
        assert!(xml.contains(r#"TargetMode="External""#));
        assert!(xml.contains("a=1&amp;b=2"));
    }
}
