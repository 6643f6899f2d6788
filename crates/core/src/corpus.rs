//! Sequential processing of a corpus of decks.

use crate::aggregate::DeckExtractor;
use crate::error::Result;
use crate::types::{Deck, DeckRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Something that can open a file and produce a parsed deck.
pub trait DeckSource {
    fn load_deck(&self, path: &Path) -> Result<Deck>;
}

/// A deck's record, tagged with the deck filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub filename: String,
    pub record: DeckRecord,
}

/// Results for every deck that produced content, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusResults {
    pub entries: Vec<DeckEntry>,

    /// Decks that could not be loaded.
    pub skipped: Vec<String>,

    /// Number of decks visited, including skipped and empty ones.
    pub processed: usize,
}

impl CorpusResults {
    /// Whether no deck produced any content.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a deck's result; empty records are not kept.
    pub fn push(&mut self, filename: impl Into<String>, record: DeckRecord) {
        self.processed += 1;
        if !record.is_empty() {
            self.entries.push(DeckEntry {
                filename: filename.into(),
                record,
            });
        }
    }

    /// Look up a deck's record by filename.
    pub fn get(&self, filename: &str) -> Option<&DeckRecord> {
        self.entries
            .iter()
            .find(|e| e.filename == filename)
            .map(|e| &e.record)
    }
}

/// Drives a [`DeckSource`] and a [`DeckExtractor`] over many files.
#[derive(Debug, Clone, Default)]
pub struct CorpusExtractor {
    extractor: DeckExtractor,
}

impl CorpusExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process every path in order; one failing deck never stops the run.
    pub fn extract_all<S, P>(&self, source: &S, paths: &[P]) -> CorpusResults
    where
        S: DeckSource,
        P: AsRef<Path>,
    {
        let mut results = CorpusResults::default();
        for path in paths {
            let path = path.as_ref();
            let filename = display_name(path);
            match source.load_deck(path) {
                Ok(deck) => {
                    log::info!("Processing {}...", filename);
                    let record = self.extractor.extract(&deck);
                    results.push(filename, record);
                }
                Err(e) => {
                    log::warn!("Error processing {}: {}", path.display(), e);
                    results.skipped.push(filename.clone());
                    results.push(filename, DeckRecord::default());
                }
            }
        }
        results
    }
}

/// The file name component of a path, or the whole path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{Shape, Slide};
    use std::collections::HashMap;

    /// In-memory decks keyed by file name; unknown names fail to load.
    struct MemorySource {
        decks: HashMap<String, Deck>,
    }

    impl MemorySource {
        fn new(decks: Vec<Deck>) -> Self {
            Self {
                decks: decks.into_iter().map(|d| (d.filename.clone(), d)).collect(),
            }
        }
    }

    impl DeckSource for MemorySource {
        fn load_deck(&self, path: &Path) -> Result<Deck> {
            self.decks
                .get(&display_name(path))
                .cloned()
                .ok_or_else(|| Error::CorruptedFile(path.display().to_string()))
        }
    }

    fn deck(name: &str, text: &str) -> Deck {
        let mut deck = Deck::new(name);
        deck.add_slide(Slide::new(1).with_shape(Shape::text(text)));
        deck
    }

    #[test]
    fn test_failed_deck_does_not_stop_run() {
        let source = MemorySource::new(vec![
            deck("A_one.pptx", "Session Goals\n• Identify rock types"),
            deck("C_three.pptx", "Related Careers\n• Geologist"),
        ]);
        let results = CorpusExtractor::new().extract_all(
            &source,
            &["decks/A_one.pptx", "decks/B_broken.pptx", "decks/C_three.pptx"],
        );
        assert_eq!(results.processed, 3);
        assert_eq!(results.skipped, vec!["B_broken.pptx"]);
        assert_eq!(results.entries.len(), 2);
        assert_eq!(results.entries[0].filename, "A_one.pptx");
        assert_eq!(results.entries[1].filename, "C_three.pptx");
        assert_eq!(results.get("C_three.pptx").unwrap().careers, vec!["Geologist"]);
        assert!(results.get("B_broken.pptx").is_none());
    }

    #[test]
    fn test_empty_decks_excluded() {
        let source = MemorySource::new(vec![deck("X_empty.pptx", "Welcome")]);
        let results = CorpusExtractor::new().extract_all(&source, &["X_empty.pptx"]);
        assert_eq!(results.processed, 1);
        assert!(results.is_empty());
        assert!(results.skipped.is_empty());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/decks/GEOL_S1.pptx")), "GEOL_S1.pptx");
        assert_eq!(display_name(Path::new("GEOL_S1.pptx")), "GEOL_S1.pptx");
    }
}
