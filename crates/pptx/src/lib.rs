//! PPTX (Office Open XML) reader for the slidedoc object model.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! decks of shapes, paragraphs and runs carrying bold flags, colors and the
//! deck's theme palette.

pub mod parser;

pub use parser::PptxParser;
