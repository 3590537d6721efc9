//! Core of the deck builder: configuration tree, document object graph,
//! named property application, the build walk and output plumbing.

pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod formatter;
pub mod model;
pub mod presentation;
pub mod properties;
pub mod style;
pub mod writer;
pub mod xml;

pub use builder::{BuildState, DocumentBuilder};
pub use config::{
    ContentConfig, LayoutConfig, PresentationConfig, RichTextConfig, SlideConfig, TextConfig,
};
pub use error::{Error, Result};
pub use format::WriterFormat;
pub use formatter::Formatter;
pub use model::{Document, DocumentProperties, Font, Layout, Shape, Slide, TextRun};
pub use presentation::{Attachment, Presentation, SendOptions};
pub use properties::{apply_properties, PropertyMap, PropertyTarget};
pub use style::{Alignment, Color, Underline, Unit};
pub use writer::{DocumentWriter, SerializedWriter, WriteSeek, WriterRegistry};
