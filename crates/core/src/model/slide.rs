//! Slides, rich-text shapes, text runs and fonts.

use crate::error::{Error, Result};
use crate::properties::{
    expect_bool, expect_f64, expect_i64, expect_opt_string, expect_str, PropertyTarget, Setter,
};
use crate::style::{Alignment, Color, Underline};
use serde::Serialize;
use serde_json::Value;

/// A single slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slide {
    pub name: Option<String>,
    pub shapes: Vec<Shape>,
}

impl Slide {
    pub fn set_name(&mut self, name: Option<String>) -> &mut Self {
        self.name = name;
        self
    }

    /// No name and no shapes.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.shapes.is_empty()
    }

    /// Append an empty rich-text shape and return it.
    pub fn create_rich_text_shape(&mut self) -> &mut Shape {
        self.shapes.push(Shape::default());
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }
}

/// Character formatting of a text run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub name: String,
    /// Points.
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub color: Color,
    /// Points.
    pub character_spacing: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 10.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            superscript: false,
            subscript: false,
            color: Color::black(),
            character_spacing: 0.0,
        }
    }
}

fn parse_color(target: &'static str, key: &str, value: &Value) -> Result<Color> {
    Color::from_hex(expect_str(target, key, value)?)
        .ok_or_else(|| Error::invalid_value(target, key, "a hex colour (RRGGBB or AARRGGBB)"))
}

macro_rules! bool_property {
    ($fn_name:ident, $ty:ty, $field:ident, $key:literal) => {
        fn $fn_name(target: &mut $ty, value: &Value) -> Result<()> {
            target.$field = expect_bool(<$ty>::KIND, $key, value)?;
            Ok(())
        }
    };
}

fn font_name(font: &mut Font, value: &Value) -> Result<()> {
    font.name = expect_str(Font::KIND, "name", value)?.to_string();
    Ok(())
}

fn font_size(font: &mut Font, value: &Value) -> Result<()> {
    let size = expect_f64(Font::KIND, "size", value)?;
    if size <= 0.0 {
        return Err(Error::invalid_value(Font::KIND, "size", "a positive number"));
    }
    font.size = size;
    Ok(())
}

bool_property!(font_bold, Font, bold, "bold");
bool_property!(font_italic, Font, italic, "italic");
bool_property!(font_strikethrough, Font, strikethrough, "strikethrough");

fn font_superscript(font: &mut Font, value: &Value) -> Result<()> {
    font.superscript = expect_bool(Font::KIND, "superScript", value)?;
    if font.superscript {
        font.subscript = false;
    }
    Ok(())
}

fn font_subscript(font: &mut Font, value: &Value) -> Result<()> {
    font.subscript = expect_bool(Font::KIND, "subScript", value)?;
    if font.subscript {
        font.superscript = false;
    }
    Ok(())
}

fn font_underline(font: &mut Font, value: &Value) -> Result<()> {
    font.underline = match value {
        Value::Bool(true) => Underline::Single,
        Value::Bool(false) => Underline::None,
        other => Underline::from_name(expect_str(Font::KIND, "underline", other)?)?,
    };
    Ok(())
}

fn font_color(font: &mut Font, value: &Value) -> Result<()> {
    font.color = parse_color(Font::KIND, "color", value)?;
    Ok(())
}

fn font_character_spacing(font: &mut Font, value: &Value) -> Result<()> {
    font.character_spacing = expect_f64(Font::KIND, "characterSpacing", value)?;
    Ok(())
}

impl PropertyTarget for Font {
    const KIND: &'static str = "font";

    fn setters() -> &'static [(&'static str, Setter<Self>)] {
        const SETTERS: &[(&str, Setter<Font>)] = &[
            ("name", font_name),
            ("size", font_size),
            ("bold", font_bold),
            ("italic", font_italic),
            ("underline", font_underline),
            ("strikethrough", font_strikethrough),
            ("superScript", font_superscript),
            ("subScript", font_subscript),
            ("color", font_color),
            ("characterSpacing", font_character_spacing),
        ];
        SETTERS
    }
}

/// Text content with its font.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextRun {
    pub content: String,
    pub font: Font,
}

impl TextRun {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font: Font::default(),
        }
    }

    pub fn font_mut(&mut self) -> &mut Font {
        &mut self.font
    }
}

/// A rich-text shape. Offsets, sizes and insets are in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub name: String,
    pub description: String,
    pub offset_x: i64,
    pub offset_y: i64,
    pub width: i64,
    pub height: i64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub fill: Option<Color>,
    pub alignment: Alignment,
    pub inset_top: f64,
    pub inset_bottom: f64,
    pub inset_left: f64,
    pub inset_right: f64,
    pub wrap: bool,
    pub columns: u32,
    pub hyperlink: Option<String>,
    pub text: Option<TextRun>,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            offset_x: 0,
            offset_y: 0,
            width: 0,
            height: 0,
            rotation: 0.0,
            fill: None,
            alignment: Alignment::Left,
            inset_top: 4.8,
            inset_bottom: 4.8,
            inset_left: 9.6,
            inset_right: 9.6,
            wrap: true,
            columns: 1,
            hyperlink: None,
            text: None,
        }
    }
}

impl Shape {
    /// Attach a text run, replacing any existing one.
    pub fn create_text(&mut self, content: impl Into<String>) -> &mut TextRun {
        self.text.insert(TextRun::new(content))
    }

    pub fn text(&self) -> Option<&TextRun> {
        self.text.as_ref()
    }
}

fn shape_name(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.name = expect_str(Shape::KIND, "name", value)?.to_string();
    Ok(())
}

fn shape_description(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.description = expect_str(Shape::KIND, "description", value)?.to_string();
    Ok(())
}

fn shape_offset_x(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.offset_x = expect_i64(Shape::KIND, "offsetX", value)?;
    Ok(())
}

fn shape_offset_y(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.offset_y = expect_i64(Shape::KIND, "offsetY", value)?;
    Ok(())
}

fn non_negative(key: &str, value: &Value) -> Result<i64> {
    let v = expect_i64(Shape::KIND, key, value)?;
    if v < 0 {
        return Err(Error::invalid_value(Shape::KIND, key, "a non-negative integer"));
    }
    Ok(v)
}

fn shape_width(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.width = non_negative("width", value)?;
    Ok(())
}

fn shape_height(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.height = non_negative("height", value)?;
    Ok(())
}

fn shape_rotation(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.rotation = expect_f64(Shape::KIND, "rotation", value)?.rem_euclid(360.0);
    Ok(())
}

fn shape_fill(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.fill = match value {
        Value::Null => None,
        other => Some(parse_color(Shape::KIND, "fill", other)?),
    };
    Ok(())
}

fn shape_alignment(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.alignment = Alignment::from_name(expect_str(Shape::KIND, "alignment", value)?)?;
    Ok(())
}

fn shape_inset_top(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.inset_top = expect_f64(Shape::KIND, "insetTop", value)?;
    Ok(())
}

fn shape_inset_bottom(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.inset_bottom = expect_f64(Shape::KIND, "insetBottom", value)?;
    Ok(())
}

fn shape_inset_left(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.inset_left = expect_f64(Shape::KIND, "insetLeft", value)?;
    Ok(())
}

fn shape_inset_right(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.inset_right = expect_f64(Shape::KIND, "insetRight", value)?;
    Ok(())
}

bool_property!(shape_wrap, Shape, wrap, "wrap");

fn shape_columns(shape: &mut Shape, value: &Value) -> Result<()> {
    let columns = expect_i64(Shape::KIND, "columns", value)?;
    shape.columns = u32::try_from(columns)
        .ok()
        .filter(|c| (1..=16).contains(c))
        .ok_or_else(|| Error::invalid_value(Shape::KIND, "columns", "an integer from 1 to 16"))?;
    Ok(())
}

fn shape_hyperlink(shape: &mut Shape, value: &Value) -> Result<()> {
    shape.hyperlink = expect_opt_string(Shape::KIND, "hyperlink", value)?;
    Ok(())
}

impl PropertyTarget for Shape {
    const KIND: &'static str = "shape";

    fn setters() -> &'static [(&'static str, Setter<Self>)] {
        const SETTERS: &[(&str, Setter<Shape>)] = &[
            ("name", shape_name),
            ("description", shape_description),
            ("offsetX", shape_offset_x),
            ("offsetY", shape_offset_y),
            ("width", shape_width),
            ("height", shape_height),
            ("rotation", shape_rotation),
            ("fill", shape_fill),
            ("alignment", shape_alignment),
            ("insetTop", shape_inset_top),
            ("insetBottom", shape_inset_bottom),
            ("insetLeft", shape_inset_left),
            ("insetRight", shape_inset_right),
            ("wrap", shape_wrap),
            ("columns", shape_columns),
            ("hyperlink", shape_hyperlink),
        ];
        SETTERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::apply_properties;
    use serde_json::json;

    #[test]
    fn test_font_properties() {
        let mut font = Font::default();
        let props = json!({"bold": true, "size": 28, "name": "Arial", "color": "336699"});
        apply_properties(&mut font, props.as_object().unwrap()).unwrap();

        assert!(font.bold);
        assert_eq!(font.size, 28.0);
        assert_eq!(font.name, "Arial");
        assert_eq!(font.color.argb(), "FF336699");
    }

    #[test]
    fn test_font_super_and_subscript_exclusive() {
        let mut font = Font::default();
        let props = json!({"superScript": true, "subScript": true});
        apply_properties(&mut font, props.as_object().unwrap()).unwrap();
        assert!(font.subscript);
        assert!(!font.superscript);
    }

    #[test]
    fn test_font_underline_forms() {
        let mut font = Font::default();
        apply_properties(&mut font, json!({"underline": true}).as_object().unwrap()).unwrap();
        assert_eq!(font.underline, Underline::Single);
        apply_properties(&mut font, json!({"underline": "double"}).as_object().unwrap()).unwrap();
        assert_eq!(font.underline, Underline::Double);
    }

    #[test]
    fn test_font_rejects_bad_values() {
        let mut font = Font::default();
        assert!(apply_properties(&mut font, json!({"size": 0}).as_object().unwrap()).is_err());
        assert!(apply_properties(&mut font, json!({"color": "blue"}).as_object().unwrap()).is_err());
        assert!(apply_properties(&mut font, json!({"bold": "yes"}).as_object().unwrap()).is_err());
    }

    #[test]
    fn test_shape_geometry() {
        let mut shape = Shape::default();
        let props = json!({
            "offsetX": 10, "offsetY": 20, "width": 300, "height": 40,
            "rotation": -90, "fill": "FFCC00", "alignment": "center", "columns": 2
        });
        apply_properties(&mut shape, props.as_object().unwrap()).unwrap();

        assert_eq!((shape.offset_x, shape.offset_y), (10, 20));
        assert_eq!((shape.width, shape.height), (300, 40));
        assert_eq!(shape.rotation, 270.0);
        assert_eq!(shape.fill.as_ref().map(|c| c.rgb()), Some("FFCC00"));
        assert_eq!(shape.alignment, Alignment::Center);
        assert_eq!(shape.columns, 2);
    }

    #[test]
    fn test_shape_rejects_negative_size_and_bad_columns() {
        let mut shape = Shape::default();
        assert!(apply_properties(&mut shape, json!({"width": -1}).as_object().unwrap()).is_err());
        assert!(apply_properties(&mut shape, json!({"columns": 0}).as_object().unwrap()).is_err());
    }

    #[test]
    fn test_shape_unknown_property() {
        let mut shape = Shape::default();
        let err = apply_properties(&mut shape, json!({"glorp": 1}).as_object().unwrap()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedProperty { target: "shape", .. }));
    }

    #[test]
    fn test_create_text_replaces_run() {
        let mut shape = Shape::default();
        shape.create_text("first").font_mut().bold = true;
        shape.create_text("second");

        let text = shape.text().unwrap();
        assert_eq!(text.content, "second");
        assert!(!text.font.bold);
    }

    #[test]
    fn test_slide_shapes_in_order() {
        let mut slide = Slide::default();
        slide.create_rich_text_shape().create_text("a");
        slide.create_rich_text_shape().create_text("b");

        let contents: Vec<_> = slide
            .shapes
            .iter()
            .filter_map(|s| s.text().map(|t| t.content.as_str()))
            .collect();
        assert_eq!(contents, vec!["a", "b"]);
    }
}
