//! PPTX (Office Open XML) writer backend for the deck builder.
//!
//! Packages a built document as a ZIP archive of PresentationML parts.

mod parts;
pub mod writer;

pub use writer::PptxWriter;
