//! Cross-deck report model: the aggregated view a report writer renders.

use crate::corpus::CorpusResults;
use crate::sections::SectionKind;
use crate::types::DeckRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A vocabulary item together with the deck it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub term: String,
    pub definition: String,
    pub source: String,
}

/// The items of one section that came from one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGroup {
    pub filename: String,
    pub items: Vec<String>,
}

/// Item counts shown in the report summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub vocabulary: usize,
    pub goals: usize,
    pub assessments: usize,
    pub careers: usize,
    pub materials: usize,
}

/// Everything a report writer needs, already sorted and grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportModel {
    pub acronym: String,

    /// All vocabulary, sorted case-insensitively by term.
    pub vocabulary: Vec<VocabularyEntry>,

    pub goals: Vec<SessionGroup>,
    pub assessments: Vec<SessionGroup>,
    pub careers: Vec<SessionGroup>,
    pub materials: Vec<SessionGroup>,

    pub summary: ReportSummary,
}

impl ReportModel {
    /// Build the report model from corpus results.
    pub fn build(acronym: impl Into<String>, results: &CorpusResults) -> Self {
        let mut vocabulary: Vec<VocabularyEntry> = results
            .entries
            .iter()
            .flat_map(|entry| {
                entry.record.vocabulary.iter().map(|item| VocabularyEntry {
                    term: item.term.clone(),
                    definition: item.definition.clone(),
                    source: entry.filename.clone(),
                })
            })
            .collect();
        vocabulary.sort_by_cached_key(|v| v.term.to_lowercase());

        let goals = group_by_session(results, SectionKind::Goals);
        let assessments = group_by_session(results, SectionKind::Assessments);
        let careers = group_by_session(results, SectionKind::Careers);
        let materials = group_by_session(results, SectionKind::Materials);

        let summary = ReportSummary {
            vocabulary: vocabulary.len(),
            goals: count_items(&goals),
            assessments: count_items(&assessments),
            careers: count_items(&careers),
            materials: count_items(&materials),
        };

        Self {
            acronym: acronym.into(),
            vocabulary,
            goals,
            assessments,
            careers,
            materials,
            summary,
        }
    }

    /// The groups of one section.
    pub fn section(&self, kind: SectionKind) -> &[SessionGroup] {
        match kind {
            SectionKind::Goals => &self.goals,
            SectionKind::Assessments => &self.assessments,
            SectionKind::Careers => &self.careers,
            SectionKind::Materials => &self.materials,
        }
    }
}

fn section_items(record: &DeckRecord, kind: SectionKind) -> &[String] {
    match kind {
        SectionKind::Goals => &record.goals,
        SectionKind::Assessments => &record.assessments,
        SectionKind::Careers => &record.careers,
        SectionKind::Materials => &record.materials,
    }
}

/// Group a section's items by deck filename, sorted by filename.
fn group_by_session(results: &CorpusResults, kind: SectionKind) -> Vec<SessionGroup> {
    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in &results.entries {
        let items = section_items(&entry.record, kind);
        if !items.is_empty() {
            groups
                .entry(entry.filename.as_str())
                .or_default()
                .extend(items.iter().cloned());
        }
    }
    groups
        .into_iter()
        .map(|(filename, items)| SessionGroup {
            filename: filename.to_string(),
            items,
        })
        .collect()
}

fn count_items(groups: &[SessionGroup]) -> usize {
    groups.iter().map(|g| g.items.len()).sum()
}
