//! Builds a document object graph from a configuration tree.
//!
//! The walk keeps a cursor on the slide being populated. A new document
//! already holds one empty slide, so each configured slide fills the slide
//! under the cursor, then appends a fresh slide and moves the cursor onto it.
//! When the walk ends the cursor sits on one leftover empty slide, which the
//! final transition removes.

use crate::config::{ContentConfig, LayoutConfig, PresentationConfig, SlideConfig, TextConfig};
use crate::error::{Error, Result};
use crate::formatter::Formatter;
use crate::model::{Document, Slide};
use crate::properties::apply_properties;
use serde_json::Value;

/// Where the builder is in its walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Nothing applied yet.
    Empty,
    /// Populating the slide at this index.
    Populating(usize),
    /// Trailing slide removed; the document is complete.
    Done,
}

/// Drives one build of `document` from a configuration tree.
pub struct DocumentBuilder<'a> {
    document: &'a mut Document,
    formatter: &'a Formatter,
    empty_slide: Option<&'a str>,
    state: BuildState,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(document: &'a mut Document, formatter: &'a Formatter) -> Self {
        Self {
            document,
            formatter,
            empty_slide: None,
            state: BuildState::Empty,
        }
    }

    /// Text placed on slides whose content list is empty.
    pub fn with_empty_slide(mut self, text: &'a str) -> Self {
        self.empty_slide = Some(text).filter(|t| !t.is_empty());
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run the whole walk: metadata, layout, every slide, then finish.
    pub fn build(mut self, config: &PresentationConfig) -> Result<BuildState> {
        if let Some(properties) = &config.document {
            apply_properties(self.document.properties_mut(), properties)?;
        }
        if let Some(layout) = &config.layout {
            self.apply_layout(layout)?;
        }
        for slide in &config.slides {
            self.add_slide(slide)?;
        }
        self.finish()?;
        log::debug!(
            "built document with {} slide(s)",
            self.document.slide_count()
        );
        Ok(self.state)
    }

    /// Set the slide size. Width and height are applied independently.
    pub fn apply_layout(&mut self, layout: &LayoutConfig) -> Result<()> {
        let target = self.document.layout_mut();
        match layout {
            LayoutConfig::Custom {
                width,
                height,
                unit,
            } => {
                target.set_cx(*width, *unit).set_cy(*height, *unit);
            }
            LayoutConfig::Preset(name) => {
                target.set_document_layout(name, true)?;
            }
        }
        Ok(())
    }

    /// Populate the slide under the cursor, then open the next one.
    pub fn add_slide(&mut self, config: &SlideConfig) -> Result<()> {
        let index = self.pending_index()?;
        let formatter = self.formatter;
        let empty_slide = self.empty_slide;

        let slide = self.document.slide_at_mut(index)?;
        slide.set_name(config.name.clone());
        for content in &config.content {
            add_shape(slide, content, formatter)?;
        }
        if config.content.is_empty() {
            if let Some(text) = empty_slide {
                slide.create_rich_text_shape().create_text(text);
            }
        }
        log::trace!(
            "slide {} populated with {} shape(s)",
            index,
            slide.shapes.len()
        );

        self.document.create_slide();
        let next = self.document.slide_count() - 1;
        self.document.set_active_index(next)?;
        self.state = BuildState::Populating(next);
        Ok(())
    }

    /// Remove the empty slide under the cursor and mark the build done.
    pub fn finish(&mut self) -> Result<()> {
        let index = self.pending_index()?;
        self.document.remove_slide_at(index)?;
        self.state = BuildState::Done;
        Ok(())
    }

    fn pending_index(&mut self) -> Result<usize> {
        match self.state {
            BuildState::Empty => {
                let index = self.starting_index()?;
                self.state = BuildState::Populating(index);
                Ok(index)
            }
            BuildState::Populating(index) => Ok(index),
            BuildState::Done => Err(Error::InvalidState(
                "document build already finished".to_string(),
            )),
        }
    }

    /// Slide the walk starts on. When the cursor is past the end or on a
    /// slide that already holds content, a fresh slide is appended first.
    fn starting_index(&mut self) -> Result<usize> {
        let index = self.document.active_index();
        let reusable = self
            .document
            .slide_at(index)
            .map(Slide::is_empty)
            .unwrap_or(false);
        if reusable {
            return Ok(index);
        }
        self.document.create_slide();
        let last = self.document.slide_count() - 1;
        self.document.set_active_index(last)?;
        Ok(last)
    }
}

/// Create one rich-text shape: text first, then the remaining properties.
fn add_shape(slide: &mut Slide, content: &ContentConfig, formatter: &Formatter) -> Result<()> {
    let text = content
        .text
        .as_ref()
        .ok_or_else(|| Error::MissingRequiredField("text".to_string()))?;

    let shape = slide.create_rich_text_shape();
    match text {
        TextConfig::Rich(rich) => {
            if let Some(key) = rich.unknown.keys().next() {
                return Err(Error::UnsupportedProperty {
                    target: "text",
                    property: key.clone(),
                });
            }
            let content = rich
                .content
                .as_ref()
                .ok_or_else(|| Error::MissingRequiredField("text.content".to_string()))?;
            let run = shape.create_text(formatter.format_value(content)?);
            if let Some(font) = &rich.font {
                apply_properties(run.font_mut(), font)?;
            }
        }
        TextConfig::Plain(value @ Value::Object(_)) => {
            // An object that did not parse as rich text has no content.
            log::debug!("text object without content: {}", value);
            return Err(Error::MissingRequiredField("text.content".to_string()));
        }
        TextConfig::Plain(value) => {
            shape.create_text(formatter.format_value(value)?);
        }
    }

    apply_properties(shape, &content.properties)?;
    Ok(())
}
