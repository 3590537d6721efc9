//! OpenDocument presentation (.odp) writer backend for the deck builder.

mod styles;
pub mod writer;

pub use writer::OdpWriter;
