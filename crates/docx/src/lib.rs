//! DOCX writer for the documentation updates report.
//!
//! Produces a minimal WordprocessingML package: title page with a content
//! summary, the vocabulary glossary, per-session sections and the manual
//! entry pages for QA tickets and notes.

pub mod document;
pub mod writer;

pub use document::{DocParagraph, DocRun, Document, ParagraphStyle};
pub use writer::{DocxReportWriter, DEFAULT_MANUAL_ENTRY_LINES};
