//! PPTX (Office Open XML) writer implementation.

use crate::parts::{self, Relationship, NS_A, NS_P, NS_R};
use deck_core::writer::{DocumentWriter, WriteSeek};
use deck_core::xml::XmlWriter;
use deck_core::{Alignment, Document, Error, Font, Result, Shape, Slide, Underline, WriterFormat};
use std::io::Write;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// EMUs per pixel at 96 dpi.
const EMU_PER_PIXEL: f64 = 9_525.0;

/// First slide id PowerPoint accepts.
const FIRST_SLIDE_ID: usize = 256;

/// Notes page size, portrait letter.
const NOTES_CX: &str = "6858000";
const NOTES_CY: &str = "9144000";

fn px_to_emu(px: f64) -> String {
    ((px * EMU_PER_PIXEL).round() as i64).to_string()
}

/// Writer for PPTX (Office Open XML) packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    fn add_part<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        name: &str,
        bytes: &[u8],
    ) -> Result<()> {
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)
            .map_err(|e| Error::Serialization(format!("ZIP error: {}", e)))?;
        zip.write_all(bytes)?;
        Ok(())
    }

    /// `ppt/presentation.xml`. Slide relationships are `rId2..`.
    fn presentation_xml(&self, document: &Document) -> Result<Vec<u8>> {
        let layout = document.layout();
        let cx = layout.cx_emu().to_string();
        let cy = layout.cy_emu().to_string();

        let mut xml = XmlWriter::document()?;
        xml.start(
            "p:presentation",
            &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P), ("saveSubsetFonts", "1")],
        )?;
        xml.start("p:sldMasterIdLst", &[])?
            .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
            .end("p:sldMasterIdLst")?;

        if document.slide_count() > 0 {
            xml.start("p:sldIdLst", &[])?;
            for index in 0..document.slide_count() {
                let id = (FIRST_SLIDE_ID + index).to_string();
                let rel_id = format!("rId{}", index + 2);
                xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
            }
            xml.end("p:sldIdLst")?;
        }

        let mut size_attrs = vec![("cx", cx.as_str()), ("cy", cy.as_str())];
        if layout.preset().is_none() {
            size_attrs.push(("type", "custom"));
        }
        xml.empty("p:sldSz", &size_attrs)?;
        xml.empty("p:notesSz", &[("cx", NOTES_CX), ("cy", NOTES_CY)])?;
        xml.end("p:presentation")?;
        Ok(xml.finish())
    }

    fn presentation_rels(&self, slide_count: usize) -> Result<Vec<u8>> {
        let mut rels = vec![Relationship::internal(
            "rId1",
            "slideMaster",
            "slideMasters/slideMaster1.xml",
        )];
        for number in 1..=slide_count {
            rels.push(Relationship::internal(
                format!("rId{}", number + 1),
                "slide",
                format!("slides/slide{}.xml", number),
            ));
        }
        let next = slide_count + 2;
        rels.push(Relationship::internal(format!("rId{}", next), "theme", "theme/theme1.xml"));
        rels.push(Relationship::internal(format!("rId{}", next + 1), "presProps", "presProps.xml"));
        rels.push(Relationship::internal(format!("rId{}", next + 2), "viewProps", "viewProps.xml"));
        rels.push(Relationship::internal(
            format!("rId{}", next + 3),
            "tableStyles",
            "tableStyles.xml",
        ));
        parts::relationships_xml(&rels)
    }

    /// Slide XML plus its relationships. Hyperlinks get `rId2..`.
    fn slide_xml(&self, slide: &Slide) -> Result<(Vec<u8>, Vec<u8>)> {
        let mut rels = vec![Relationship::internal(
            "rId1",
            "slideLayout",
            "../slideLayouts/slideLayout1.xml",
        )];

        let mut xml = XmlWriter::document()?;
        xml.start("p:sld", &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)])?;
        match slide.name.as_deref() {
            Some(name) => xml.start("p:cSld", &[("name", name)])?,
            None => xml.start("p:cSld", &[])?,
        };
        xml.start("p:spTree", &[])?;
        xml.start("p:nvGrpSpPr", &[])?
            .empty("p:cNvPr", &[("id", "1"), ("name", "")])?
            .empty("p:cNvGrpSpPr", &[])?
            .empty("p:nvPr", &[])?
            .end("p:nvGrpSpPr")?;
        xml.start("p:grpSpPr", &[])?
            .start("a:xfrm", &[])?
            .empty("a:off", &[("x", "0"), ("y", "0")])?
            .empty("a:ext", &[("cx", "0"), ("cy", "0")])?
            .empty("a:chOff", &[("x", "0"), ("y", "0")])?
            .empty("a:chExt", &[("cx", "0"), ("cy", "0")])?
            .end("a:xfrm")?
            .end("p:grpSpPr")?;

        for (index, shape) in slide.shapes.iter().enumerate() {
            let hyperlink = shape.hyperlink.as_ref().map(|url| {
                let id = format!("rId{}", rels.len() + 1);
                rels.push(Relationship::external(id.clone(), "hyperlink", url.clone()));
                id
            });
            self.write_shape(&mut xml, shape, index + 2, hyperlink.as_deref())?;
        }

        xml.end("p:spTree")?.end("p:cSld")?;
        xml.start("p:clrMapOvr", &[])?
            .empty("a:masterClrMapping", &[])?
            .end("p:clrMapOvr")?;
        xml.end("p:sld")?;

        Ok((xml.finish(), parts::relationships_xml(&rels)?))
    }

    fn write_shape(
        &self,
        xml: &mut XmlWriter,
        shape: &Shape,
        id: usize,
        hyperlink: Option<&str>,
    ) -> Result<()> {
        let id = id.to_string();
        let name = if shape.name.is_empty() {
            format!("TextBox {}", id)
        } else {
            shape.name.clone()
        };

        xml.start("p:sp", &[])?.start("p:nvSpPr", &[])?;
        let mut c_nv_pr = vec![("id", id.as_str()), ("name", name.as_str())];
        if !shape.description.is_empty() {
            c_nv_pr.push(("descr", shape.description.as_str()));
        }
        match hyperlink {
            Some(rel_id) => {
                xml.start("p:cNvPr", &c_nv_pr)?
                    .empty("a:hlinkClick", &[("r:id", rel_id)])?
                    .end("p:cNvPr")?;
            }
            None => {
                xml.empty("p:cNvPr", &c_nv_pr)?;
            }
        }
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?
            .empty("p:nvPr", &[])?
            .end("p:nvSpPr")?;

        // Geometry
        let rot = ((shape.rotation * 60_000.0).round() as i64).to_string();
        let off_x = px_to_emu(shape.offset_x as f64);
        let off_y = px_to_emu(shape.offset_y as f64);
        let ext_cx = px_to_emu(shape.width as f64);
        let ext_cy = px_to_emu(shape.height as f64);
        xml.start("p:spPr", &[])?;
        if shape.rotation != 0.0 {
            xml.start("a:xfrm", &[("rot", rot.as_str())])?;
        } else {
            xml.start("a:xfrm", &[])?;
        }
        xml.empty("a:off", &[("x", off_x.as_str()), ("y", off_y.as_str())])?
            .empty("a:ext", &[("cx", ext_cx.as_str()), ("cy", ext_cy.as_str())])?
            .end("a:xfrm")?;
        xml.start("a:prstGeom", &[("prst", "rect")])?
            .empty("a:avLst", &[])?
            .end("a:prstGeom")?;
        match &shape.fill {
            Some(color) => {
                xml.start("a:solidFill", &[])?;
                write_color(xml, color)?;
                xml.end("a:solidFill")?;
            }
            None => {
                xml.empty("a:noFill", &[])?;
            }
        }
        xml.end("p:spPr")?;

        // Text body
        let l_ins = px_to_emu(shape.inset_left);
        let t_ins = px_to_emu(shape.inset_top);
        let r_ins = px_to_emu(shape.inset_right);
        let b_ins = px_to_emu(shape.inset_bottom);
        let num_col = shape.columns.to_string();
        xml.start("p:txBody", &[])?;
        xml.empty(
            "a:bodyPr",
            &[
                ("wrap", if shape.wrap { "square" } else { "none" }),
                ("lIns", l_ins.as_str()),
                ("tIns", t_ins.as_str()),
                ("rIns", r_ins.as_str()),
                ("bIns", b_ins.as_str()),
                ("numCol", num_col.as_str()),
                ("rtlCol", "0"),
            ],
        )?;
        xml.empty("a:lstStyle", &[])?;
        xml.start("a:p", &[])?;
        xml.empty("a:pPr", &[("algn", alignment_code(shape.alignment))])?;
        if let Some(text) = shape.text() {
            xml.start("a:r", &[])?;
            write_run_properties(xml, &text.font)?;
            xml.text_element("a:t", &[], &text.content)?;
            xml.end("a:r")?;
        }
        xml.end("a:p")?.end("p:txBody")?.end("p:sp")?;
        Ok(())
    }
}

fn alignment_code(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
        Alignment::Justify => "just",
    }
}

fn write_color(xml: &mut XmlWriter, color: &deck_core::Color) -> Result<()> {
    if color.alpha() == 0xFF {
        xml.empty("a:srgbClr", &[("val", color.rgb())])?;
    } else {
        // DrawingML alpha is in thousandths of a percent.
        let alpha = (u32::from(color.alpha()) * 100_000 / 255).to_string();
        xml.start("a:srgbClr", &[("val", color.rgb())])?
            .empty("a:alpha", &[("val", alpha.as_str())])?
            .end("a:srgbClr")?;
    }
    Ok(())
}

fn write_run_properties(xml: &mut XmlWriter, font: &Font) -> Result<()> {
    let size = ((font.size * 100.0).round() as i64).to_string();
    let spacing = ((font.character_spacing * 100.0).round() as i64).to_string();
    let mut attrs = vec![
        ("lang", "en-US"),
        ("sz", size.as_str()),
        ("b", if font.bold { "1" } else { "0" }),
        ("i", if font.italic { "1" } else { "0" }),
    ];
    match font.underline {
        Underline::None => {}
        Underline::Single => attrs.push(("u", "sng")),
        Underline::Double => attrs.push(("u", "dbl")),
    }
    if font.strikethrough {
        attrs.push(("strike", "sngStrike"));
    }
    if font.superscript {
        attrs.push(("baseline", "30000"));
    } else if font.subscript {
        attrs.push(("baseline", "-25000"));
    }
    if font.character_spacing != 0.0 {
        attrs.push(("spc", spacing.as_str()));
    }
    attrs.push(("dirty", "0"));

    xml.start("a:rPr", &attrs)?;
    xml.start("a:solidFill", &[])?;
    write_color(xml, &font.color)?;
    xml.end("a:solidFill")?;
    xml.empty("a:latin", &[("typeface", font.name.as_str())])?;
    xml.end("a:rPr")?;
    Ok(())
}

impl DocumentWriter for PptxWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::PowerPoint2007
    }

    fn write(&self, document: &Document, out: &mut dyn WriteSeek) -> Result<()> {
        let slide_count = document.slide_count();
        let mut zip = ZipWriter::new(out);

        self.add_part(&mut zip, "[Content_Types].xml", &parts::content_types_xml(slide_count)?)?;
        self.add_part(&mut zip, "_rels/.rels", &parts::root_relationships_xml()?)?;
        self.add_part(
            &mut zip,
            "docProps/core.xml",
            &parts::core_properties_xml(document.properties())?,
        )?;
        self.add_part(
            &mut zip,
            "docProps/app.xml",
            &parts::app_properties_xml(document.properties(), slide_count)?,
        )?;

        self.add_part(&mut zip, "ppt/presentation.xml", &self.presentation_xml(document)?)?;
        self.add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &self.presentation_rels(slide_count)?,
        )?;

        for (index, slide) in document.slides().iter().enumerate() {
            let number = index + 1;
            let (slide_xml, slide_rels) = self.slide_xml(slide)?;
            self.add_part(&mut zip, &format!("ppt/slides/slide{}.xml", number), &slide_xml)?;
            self.add_part(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels,
            )?;
        }

        let master_rels = parts::relationships_xml(&[
            Relationship::internal("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
            Relationship::internal("rId2", "theme", "../theme/theme1.xml"),
        ])?;
        let layout_rels = parts::relationships_xml(&[Relationship::internal(
            "rId1",
            "slideMaster",
            "../slideMasters/slideMaster1.xml",
        )])?;
        self.add_part(&mut zip, "ppt/slideMasters/slideMaster1.xml", parts::SLIDE_MASTER_XML.as_bytes())?;
        self.add_part(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", &master_rels)?;
        self.add_part(&mut zip, "ppt/slideLayouts/slideLayout1.xml", parts::SLIDE_LAYOUT_XML.as_bytes())?;
        self.add_part(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", &layout_rels)?;
        self.add_part(&mut zip, "ppt/theme/theme1.xml", parts::THEME_XML.as_bytes())?;
        self.add_part(&mut zip, "ppt/presProps.xml", parts::PRES_PROPS_XML.as_bytes())?;
        self.add_part(&mut zip, "ppt/viewProps.xml", parts::VIEW_PROPS_XML.as_bytes())?;
        self.add_part(&mut zip, "ppt/tableStyles.xml", parts::TABLE_STYLES_XML.as_bytes())?;

        zip.finish()
            .map_err(|e| Error::Serialization(format!("ZIP error: {}", e)))?;
        log::debug!("wrote PPTX package with {} slide(s)", slide_count);
        Ok(())
    }
}
