//! In-memory document object graph.
//!
//! A [`Document`] owns slides, each slide owns rich-text shapes, and each
//! shape owns at most one text run with its font. Every property-bearing
//! object implements [`PropertyTarget`](crate::properties::PropertyTarget)
//! so configuration maps can be applied to it by name.

mod document;
mod slide;

pub use document::{Document, DocumentProperties, Layout, LAYOUT_PRESETS};
pub use slide::{Font, Shape, Slide, TextRun};
