//! Automatic styles for frames, paragraphs and text spans.

use deck_core::xml::XmlWriter;
use deck_core::{Alignment, Color, Font, Result, Shape, Underline, Unit};

/// Pixel length as centimetres, the unit ODF attributes use here.
pub(crate) fn px_cm(px: f64) -> String {
    cm(Unit::Pixel.to_emu(px))
}

pub(crate) fn cm(emu: i64) -> String {
    format!("{:.3}cm", Unit::Centimeter.from_emu(emu))
}

fn hex(color: &Color) -> String {
    format!("#{}", color.rgb().to_lowercase())
}

/// Style names for the shape at `index` on every slide-wide counter.
pub(crate) struct ShapeStyles {
    pub graphic: String,
    pub paragraph: String,
    pub text: String,
}

impl ShapeStyles {
    pub fn numbered(index: usize) -> Self {
        Self {
            graphic: format!("gr{}", index),
            paragraph: format!("P{}", index),
            text: format!("T{}", index),
        }
    }
}

pub(crate) fn write_graphic_style(xml: &mut XmlWriter, name: &str, shape: &Shape) -> Result<()> {
    let padding_top = px_cm(shape.inset_top);
    let padding_bottom = px_cm(shape.inset_bottom);
    let padding_left = px_cm(shape.inset_left);
    let padding_right = px_cm(shape.inset_right);
    let fill_color = shape.fill.as_ref().map(hex);
    let opacity = shape
        .fill
        .as_ref()
        .filter(|c| c.alpha() != 0xFF)
        .map(|c| format!("{}%", (u32::from(c.alpha()) * 100 + 127) / 255));

    let mut attrs = vec![
        ("draw:stroke", "none"),
        ("fo:padding-top", padding_top.as_str()),
        ("fo:padding-bottom", padding_bottom.as_str()),
        ("fo:padding-left", padding_left.as_str()),
        ("fo:padding-right", padding_right.as_str()),
        ("fo:wrap-option", if shape.wrap { "wrap" } else { "no-wrap" }),
        ("draw:auto-grow-height", "false"),
    ];
    match &fill_color {
        Some(color) => {
            attrs.push(("draw:fill", "solid"));
            attrs.push(("draw:fill-color", color.as_str()));
        }
        None => attrs.push(("draw:fill", "none")),
    }
    if let Some(opacity) = &opacity {
        attrs.push(("draw:opacity", opacity.as_str()));
    }

    xml.start("style:style", &[("style:name", name), ("style:family", "graphic")])?;
    if shape.columns > 1 {
        let count = shape.columns.to_string();
        xml.start("style:graphic-properties", &attrs)?
            .empty("style:columns", &[("fo:column-count", count.as_str())])?
            .end("style:graphic-properties")?;
    } else {
        xml.empty("style:graphic-properties", &attrs)?;
    }
    xml.end("style:style")?;
    Ok(())
}

pub(crate) fn write_paragraph_style(
    xml: &mut XmlWriter,
    name: &str,
    alignment: Alignment,
) -> Result<()> {
    let align = match alignment {
        Alignment::Left => "start",
        Alignment::Center => "center",
        Alignment::Right => "end",
        Alignment::Justify => "justify",
    };
    xml.start("style:style", &[("style:name", name), ("style:family", "paragraph")])?
        .empty("style:paragraph-properties", &[("fo:text-align", align)])?
        .end("style:style")?;
    Ok(())
}

pub(crate) fn write_text_style(xml: &mut XmlWriter, name: &str, font: &Font) -> Result<()> {
    let size = format!("{}pt", font.size);
    let color = hex(&font.color);
    let spacing = format!("{}pt", font.character_spacing);

    let mut attrs = vec![
        ("fo:font-family", font.name.as_str()),
        ("fo:font-size", size.as_str()),
        ("fo:color", color.as_str()),
        ("fo:font-weight", if font.bold { "bold" } else { "normal" }),
        ("fo:font-style", if font.italic { "italic" } else { "normal" }),
    ];
    match font.underline {
        Underline::None => {}
        Underline::Single => attrs.push(("style:text-underline-style", "solid")),
        Underline::Double => {
            attrs.push(("style:text-underline-style", "solid"));
            attrs.push(("style:text-underline-type", "double"));
        }
    }
    if font.strikethrough {
        attrs.push(("style:text-line-through-style", "solid"));
    }
    if font.superscript {
        attrs.push(("style:text-position", "super 58%"));
    } else if font.subscript {
        attrs.push(("style:text-position", "sub 58%"));
    }
    if font.character_spacing != 0.0 {
        attrs.push(("fo:letter-spacing", spacing.as_str()));
    }

    xml.start("style:style", &[("style:name", name), ("style:family", "text")])?
        .empty("style:text-properties", &attrs)?
        .end("style:style")?;
    Ok(())
}
