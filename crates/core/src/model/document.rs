//! Document, document properties and layout.

use super::slide::Slide;
use crate::error::{Error, Result};
use crate::properties::{expect_i64, expect_str, PropertyTarget, Setter};
use crate::style::Unit;
use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Named slide sizes in EMU, landscape orientation (`name`, `cx`, `cy`).
pub const LAYOUT_PRESETS: &[(&str, i64, i64)] = &[
    ("screen4x3", 9_144_000, 6_858_000),
    ("screen16x10", 9_144_000, 5_715_000),
    ("screen16x9", 9_144_000, 5_143_500),
    ("35mm", 10_287_000, 6_858_000),
    ("A3", 15_120_000, 10_692_000),
    ("A4", 10_692_000, 7_560_000),
    ("B4ISO", 10_826_750, 8_120_063),
    ("B5ISO", 7_169_150, 5_376_863),
    ("banner", 7_315_200, 914_400),
    ("letter", 9_144_000, 6_858_000),
    ("overhead", 9_144_000, 6_858_000),
];

/// Slide dimensions, stored in EMU.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Preset name, or empty for a custom size.
    name: String,
    cx: i64,
    cy: i64,
}

impl Default for Layout {
    fn default() -> Self {
        let (name, cx, cy) = LAYOUT_PRESETS[0];
        Self {
            name: name.to_string(),
            cx,
            cy,
        }
    }
}

impl Layout {
    /// Apply a named preset. Portrait swaps the preset's width and height.
    pub fn set_document_layout(&mut self, name: &str, landscape: bool) -> Result<&mut Self> {
        let (preset, cx, cy) = LAYOUT_PRESETS
            .iter()
            .find(|(preset, _, _)| preset.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| {
                log::warn!("unknown layout preset '{}'", name);
                Error::invalid_value("layout", "documentLayout", "a known layout preset")
            })?;

        self.name = preset.to_string();
        if landscape {
            self.cx = cx;
            self.cy = cy;
        } else {
            self.cx = cy;
            self.cy = cx;
        }
        Ok(self)
    }

    /// Set the slide width, switching to a custom layout.
    pub fn set_cx(&mut self, value: f64, unit: Unit) -> &mut Self {
        self.cx = unit.to_emu(value);
        self.name.clear();
        self
    }

    /// Set the slide height, switching to a custom layout.
    pub fn set_cy(&mut self, value: f64, unit: Unit) -> &mut Self {
        self.cy = unit.to_emu(value);
        self.name.clear();
        self
    }

    pub fn cx(&self, unit: Unit) -> f64 {
        unit.from_emu(self.cx)
    }

    pub fn cy(&self, unit: Unit) -> f64 {
        unit.from_emu(self.cy)
    }

    pub fn cx_emu(&self) -> i64 {
        self.cx
    }

    pub fn cy_emu(&self) -> i64 {
        self.cy
    }

    /// Preset name, `None` for custom sizes.
    pub fn preset(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentProperties {
    pub creator: String,
    pub last_modified_by: String,
    /// Unix seconds.
    pub created: i64,
    /// Unix seconds.
    pub modified: i64,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub keywords: String,
    pub category: String,
    pub company: String,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self {
            creator: "Unknown Creator".to_string(),
            last_modified_by: "Unknown Creator".to_string(),
            created: now,
            modified: now,
            title: "Untitled Presentation".to_string(),
            description: String::new(),
            subject: String::new(),
            keywords: String::new(),
            category: String::new(),
            company: String::new(),
        }
    }
}

macro_rules! text_property {
    ($fn_name:ident, $field:ident, $key:literal) => {
        fn $fn_name(props: &mut DocumentProperties, value: &Value) -> Result<()> {
            props.$field = expect_str(DocumentProperties::KIND, $key, value)?.to_string();
            Ok(())
        }
    };
}

text_property!(set_creator, creator, "creator");
text_property!(set_last_modified_by, last_modified_by, "lastModifiedBy");
text_property!(set_title, title, "title");
text_property!(set_description, description, "description");
text_property!(set_subject, subject, "subject");
text_property!(set_keywords, keywords, "keywords");
text_property!(set_category, category, "category");
text_property!(set_company, company, "company");

fn set_created(props: &mut DocumentProperties, value: &Value) -> Result<()> {
    props.created = expect_i64(DocumentProperties::KIND, "created", value)?;
    Ok(())
}

fn set_modified(props: &mut DocumentProperties, value: &Value) -> Result<()> {
    props.modified = expect_i64(DocumentProperties::KIND, "modified", value)?;
    Ok(())
}

impl PropertyTarget for DocumentProperties {
    const KIND: &'static str = "document";

    fn setters() -> &'static [(&'static str, Setter<Self>)] {
        const SETTERS: &[(&str, Setter<DocumentProperties>)] = &[
            ("creator", set_creator),
            ("lastModifiedBy", set_last_modified_by),
            ("created", set_created),
            ("modified", set_modified),
            ("title", set_title),
            ("description", set_description),
            ("subject", set_subject),
            ("keywords", set_keywords),
            ("category", set_category),
            ("company", set_company),
        ];
        SETTERS
    }
}

/// A presentation under construction.
///
/// A new document holds one empty slide and its active cursor points at it.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    properties: DocumentProperties,
    layout: Layout,
    slides: Vec<Slide>,
    #[serde(skip)]
    active_index: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            properties: DocumentProperties::default(),
            layout: Layout::default(),
            slides: vec![Slide::default()],
            active_index: 0,
        }
    }

    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Append an empty slide. The active cursor does not move.
    pub fn create_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slide_at(&self, index: usize) -> Result<&Slide> {
        self.slides
            .get(index)
            .ok_or(Error::SlideIndexOutOfRange(index))
    }

    pub fn slide_at_mut(&mut self, index: usize) -> Result<&mut Slide> {
        self.slides
            .get_mut(index)
            .ok_or(Error::SlideIndexOutOfRange(index))
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn set_active_index(&mut self, index: usize) -> Result<()> {
        if index >= self.slides.len() {
            return Err(Error::SlideIndexOutOfRange(index));
        }
        self.active_index = index;
        Ok(())
    }

    pub fn active_slide_mut(&mut self) -> Result<&mut Slide> {
        self.slide_at_mut(self.active_index)
    }

    /// Remove and return the slide at `index`.
    ///
    /// Slides after `index` shift down and the cursor follows them. Removing
    /// the slide under the cursor leaves it on the next slide, or one past
    /// the end when there is none.
    pub fn remove_slide_at(&mut self, index: usize) -> Result<Slide> {
        if index >= self.slides.len() {
            return Err(Error::SlideIndexOutOfRange(index));
        }
        let removed = self.slides.remove(index);
        if self.active_index > index {
            self.active_index -= 1;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::apply_properties;
    use serde_json::json;

    #[test]
    fn test_new_document_has_implicit_slide() {
        let doc = Document::new();
        assert_eq!(doc.slide_count(), 1);
        assert_eq!(doc.active_index(), 0);
        assert!(doc.slides()[0].shapes.is_empty());
    }

    #[test]
    fn test_create_slide_keeps_cursor() {
        let mut doc = Document::new();
        doc.create_slide();
        assert_eq!(doc.slide_count(), 2);
        assert_eq!(doc.active_index(), 0);
        doc.set_active_index(1).unwrap();
        assert_eq!(doc.active_index(), 1);
    }

    #[test]
    fn test_cursor_out_of_range() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.set_active_index(1),
            Err(Error::SlideIndexOutOfRange(1))
        ));
        assert!(doc.remove_slide_at(3).is_err());
    }

    #[test]
    fn test_remove_last_slide_leaves_cursor_past_end() {
        let mut doc = Document::new();
        doc.create_slide();
        doc.set_active_index(1).unwrap();
        doc.remove_slide_at(1).unwrap();
        assert_eq!(doc.slide_count(), 1);
        assert_eq!(doc.active_index(), 1);
        assert!(matches!(
            doc.active_slide_mut(),
            Err(Error::SlideIndexOutOfRange(1))
        ));
    }

    #[test]
    fn test_remove_earlier_slide_shifts_cursor() {
        let mut doc = Document::new();
        doc.create_slide();
        doc.create_slide().set_name(Some("third".to_string()));
        doc.set_active_index(2).unwrap();
        doc.remove_slide_at(0).unwrap();
        assert_eq!(doc.active_index(), 1);
        assert_eq!(doc.active_slide_mut().unwrap().name.as_deref(), Some("third"));
    }

    #[test]
    fn test_layout_default_and_presets() {
        let mut layout = Layout::default();
        assert_eq!(layout.preset(), Some("screen4x3"));
        assert_eq!(layout.cx_emu(), 9_144_000);

        layout.set_document_layout("SCREEN16X9", true).unwrap();
        assert_eq!(layout.preset(), Some("screen16x9"));
        assert_eq!(layout.cy_emu(), 5_143_500);

        layout.set_document_layout("A4", false).unwrap();
        assert_eq!(layout.cx_emu(), 7_560_000);
        assert_eq!(layout.cy_emu(), 10_692_000);

        assert!(layout.set_document_layout("postcard", true).is_err());
    }

    #[test]
    fn test_layout_custom_dimensions_are_independent() {
        let mut layout = Layout::default();
        layout.set_cx(20.0, Unit::Centimeter).set_cy(10.0, Unit::Centimeter);
        assert_eq!(layout.preset(), None);
        assert_eq!(layout.cx_emu(), 7_200_000);
        assert_eq!(layout.cy_emu(), 3_600_000);
        assert!((layout.cy(Unit::Millimeter) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_document_properties() {
        let mut props = DocumentProperties::default();
        let map = json!({"title": "Quarterly", "creator": "Ops", "created": 1700000000});
        apply_properties(&mut props, map.as_object().unwrap()).unwrap();
        assert_eq!(props.title, "Quarterly");
        assert_eq!(props.creator, "Ops");
        assert_eq!(props.created, 1_700_000_000);
    }

    #[test]
    fn test_document_properties_reject_unknown() {
        let mut props = DocumentProperties::default();
        let map = json!({"author": "x"});
        assert!(matches!(
            apply_properties(&mut props, map.as_object().unwrap()),
            Err(Error::UnsupportedProperty { target: "document", .. })
        ));
    }
}
