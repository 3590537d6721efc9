//! Declarative configuration tree.
//!
//! The tree is plain data: it is deserialized once (usually from JSON) and
//! read, never modified, while a document is built from it.

use crate::error::{Error, Result};
use crate::properties::PropertyMap;
use crate::style::Unit;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Root of the configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Document metadata, applied to the document properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<PropertyMap>,

    /// Slide size. Absent keeps the document's default layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,

    /// Slides in rendering order.
    #[serde(default)]
    pub slides: Vec<SlideConfig>,
}

impl PresentationConfig {
    /// Parse a configuration tree from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_document(mut self, properties: PropertyMap) -> Self {
        self.document = Some(properties);
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_slide(mut self, slide: SlideConfig) -> Self {
        self.slides.push(slide);
        self
    }
}

/// Either an explicit size or a named preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutConfig {
    Custom {
        #[serde(alias = "x")]
        width: f64,
        #[serde(alias = "y")]
        height: f64,
        #[serde(default)]
        unit: Unit,
    },
    Preset(String),
}

/// One slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Shapes in rendering order.
    #[serde(default)]
    pub content: Vec<ContentConfig>,
}

impl SlideConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: ContentConfig) -> Self {
        self.content.push(content);
        self
    }
}

/// One shape: its text plus shape properties.
///
/// `text` is kept apart from the remaining keys, which are applied to the
/// shape after the text run has been attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,

    #[serde(flatten)]
    pub properties: PropertyMap,
}

impl ContentConfig {
    pub fn new(text: impl Into<TextConfig>) -> Self {
        Self {
            text: Some(text.into()),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Shape text: a scalar, or content with font properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextConfig {
    Rich(RichTextConfig),
    /// Strings are used as-is; numbers, booleans and null go through the
    /// formatter.
    Plain(Value),
}

impl From<&str> for TextConfig {
    fn from(text: &str) -> Self {
        TextConfig::Plain(Value::String(text.to_string()))
    }
}

impl From<String> for TextConfig {
    fn from(text: String) -> Self {
        TextConfig::Plain(Value::String(text))
    }
}

impl From<RichTextConfig> for TextConfig {
    fn from(rich: RichTextConfig) -> Self {
        TextConfig::Rich(rich)
    }
}

/// `{content, font}` text object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PropertyMap>,

    /// Keys other than `content` and `font`. The builder rejects them.
    #[serde(flatten, skip_serializing_if = "serde_json::Map::is_empty")]
    pub unknown: PropertyMap,
}

impl RichTextConfig {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(Value::String(content.into())),
            font: None,
            unknown: PropertyMap::new(),
        }
    }

    pub fn with_font(mut self, font: PropertyMap) -> Self {
        self.font = Some(font);
        self
    }
}
