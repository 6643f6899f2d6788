//! Slide deck object model and the heuristic extraction engine that pulls
//! vocabulary, session goals, assessments, careers and materials out of
//! session decks.

pub mod aggregate;
pub mod color;
pub mod corpus;
pub mod error;
pub mod exclusion;
pub mod naming;
pub mod report;
pub mod sections;
pub mod types;
pub mod vocabulary;

pub use aggregate::DeckExtractor;
pub use color::{is_emphasis_color, ColorResolver};
pub use corpus::{CorpusExtractor, CorpusResults, DeckEntry, DeckSource};
pub use error::{Error, Result};
pub use exclusion::is_excluded_term;
pub use naming::{default_report_filename, module_acronym};
pub use report::{ReportModel, ReportSummary, SessionGroup, VocabularyEntry};
pub use sections::{SectionExtractor, SectionKind};
pub use types::{
    ColorSpec, ColorValue, Deck, DeckRecord, Paragraph, Shape, Slide, TextFrame, TextRun,
    ThemePalette, ThemeSlot, VocabularyItem,
};
pub use vocabulary::VocabularyExtractor;
