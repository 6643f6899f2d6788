//! Per-deck aggregation of slide-level extraction results.

use crate::sections::{SectionExtractor, SectionKind};
use crate::types::{Deck, DeckRecord, VocabularyItem};
use crate::vocabulary::VocabularyExtractor;

/// Runs every extractor over a deck and merges the per-slide results.
#[derive(Debug, Clone)]
pub struct DeckExtractor {
    vocabulary: VocabularyExtractor,
    goals: SectionExtractor,
    assessments: SectionExtractor,
    careers: SectionExtractor,
    materials: SectionExtractor,
}

impl Default for DeckExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckExtractor {
    pub fn new() -> Self {
        Self {
            vocabulary: VocabularyExtractor::new(),
            goals: SectionExtractor::goals(),
            assessments: SectionExtractor::assessments(),
            careers: SectionExtractor::careers(),
            materials: SectionExtractor::materials(),
        }
    }

    /// Extract a deck's record, visiting slides in document order.
    pub fn extract(&self, deck: &Deck) -> DeckRecord {
        let mut acc = DeckAccumulator::default();

        for slide in &deck.slides {
            let vocab = self.vocabulary.extract_from_slide(slide, &deck.theme);
            log_found(slide.number, vocab.len(), "vocabulary item");
            acc.add_vocabulary(vocab);

            for extractor in [&self.goals, &self.assessments, &self.careers, &self.materials] {
                let items = extractor.extract(slide);
                log_found(slide.number, items.len(), extractor.kind().label());
                acc.add_section(extractor.kind(), items);
            }
        }

        acc.finish()
    }
}

fn log_found(slide: usize, count: usize, what: &str) {
    if count > 0 {
        log::debug!("Found {} {}(s) on slide {}", count, what, slide);
    }
}

/// Merge state for one deck; never shared between decks.
#[derive(Debug, Default)]
struct DeckAccumulator {
    record: DeckRecord,
}

impl DeckAccumulator {
    /// Vocabulary is appended as-is: a term may recur with another definition.
    fn add_vocabulary(&mut self, items: Vec<VocabularyItem>) {
        self.record.vocabulary.extend(items);
    }

    fn add_section(&mut self, kind: SectionKind, items: Vec<String>) {
        match kind {
            SectionKind::Goals => append_unique(&mut self.record.goals, items),
            SectionKind::Assessments => append_unique(&mut self.record.assessments, items),
            SectionKind::Careers => {
                // last non-empty slide wins
                if !items.is_empty() {
                    self.record.careers = items;
                }
            }
            SectionKind::Materials => self.record.materials.extend(items),
        }
    }

    fn finish(self) -> DeckRecord {
        self.record
    }
}

fn append_unique(list: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}
