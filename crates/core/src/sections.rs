//! Trigger-anchored extraction of goals, assessments, careers and materials.
//!
//! All four sections use the same two-phase algorithm:
//!
//! 1. **Slide gate**: the slide is considered only if some shape's text
//!    matches one of the section's trigger patterns.
//! 2. **Per-shape extraction**: a shape containing a trigger contributes the
//!    lines after the trigger match; any other shape on the slide is read as
//!    a continuation and contributes only lines that look like list items for
//!    that section.
//!
//! Sections differ only in their [`SectionRules`].

use crate::types::{Slide, TextFrame};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Leading bullet glyphs stripped from list items.
const BULLETS: &[char] = &['•', '·', '-', '*', '◦'];

/// Numbered-list marker removed from items ("1. ", "2) "), but never a bare
/// quantity such as "2 safety goggles".
static LIST_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]\s+").unwrap());

/// A line that starts like a numbered list entry.
static NUMBERED_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.?\s+").unwrap());

fn compile_triggers(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build().unwrap())
        .collect()
}

static GOAL_TRIGGERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_triggers(&[
        r"In today's session,?\s*you will:?",
        r"In this session,?\s*you will:?",
        r"Today,?\s*you will:?",
        r"^Goals\n?$",
        r"Session Goals",
        r"Learning Goals",
        r"^Objectives\n?$",
    ])
});

static ASSESSMENT_TRIGGERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_triggers(&[
        r"your instructor will be evaluating you",
        r"listed onscreen are the specific items",
        r"assessment",
        r"you will be evaluated on",
        r"evaluation criteria",
        r"instructor will evaluate",
        r"assessment criteria",
        r"performance indicators",
        r"you should be able to",
    ])
});

static CAREER_TRIGGERS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_triggers(&[r"\brelated careers\b", r"\bcareers\b"]));

static MATERIAL_TRIGGERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_triggers(&[
        r"gather\s+the\s+following\s+items?",
        r"locate\s+the\s+following",
        r"\blocate\s+the\b",
    ])
});

/// Student-facing instructions that share slides with goal and assessment lists.
const INSTRUCTION_BOILERPLATE: &[&str] = &[
    "now that you have completed",
    "module activity sheet",
    "student portfolio",
    "turn on your call light",
    "review the following skills",
    "waiting for your instructor",
];

const ASSESSMENT_BOILERPLATE: &[&str] = &[
    "now that you have completed",
    "module activity sheet",
    "student portfolio",
    "turn on your call light",
    "review the following skills",
    "waiting for your instructor",
    "find the module activity sheet",
];

/// Template lines that never carry content on a continuation shape.
const SKIP_TERMS: &[&str] = &[
    "insert",
    "slide layout",
    "media description",
    "copyright",
    "©",
];

const GOAL_VERBS: &[&str] = &[
    "will",
    "explore",
    "examine",
    "learn",
    "understand",
    "identify",
    "analyze",
    "demonstrate",
    "observe",
    "discover",
    "explain",
    "describe",
    "investigate",
    "construct",
    "compare",
    "use",
    "apply",
    "evaluate",
    "create",
    "synthesize",
    "capture",
    "develop",
    "practice",
    "determine",
    "calculate",
    "solve",
    "recognize",
    "review",
    "begin",
    "complete",
];

const ASSESSMENT_VERBS: &[&str] = &[
    "describe",
    "explain",
    "identify",
    "analyze",
    "compare",
    "demonstrate",
    "use",
    "construct",
    "examine",
    "define",
    "name",
    "list",
    "calculate",
    "determine",
    "give",
    "provide",
    "show",
    "illustrate",
    "evaluate",
];

/// The four trigger-anchored sections of a session deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Goals,
    Assessments,
    Careers,
    Materials,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        Self::Goals,
        Self::Assessments,
        Self::Careers,
        Self::Materials,
    ];

    /// Human-readable name used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Goals => "session goal",
            Self::Assessments => "assessment item",
            Self::Careers => "career",
            Self::Materials => "material item",
        }
    }
}

/// How a line on a continuation shape qualifies as a section item.
#[derive(Debug, Clone, Copy)]
enum Acceptance {
    /// Bullet, number marker, or any of the given action verbs.
    ActionVerbs(&'static [&'static str]),
    /// Bullet, number marker, or a short line starting upper-case and not
    /// ending in a colon.
    TitleLine { max_chars: usize },
    /// Bullet, number marker, or a short line not ending in a colon.
    ShortLine { max_chars: usize },
}

/// Parameters of the shared extraction algorithm for one section.
#[derive(Debug, Clone)]
pub struct SectionRules {
    kind: SectionKind,
    triggers: &'static [Regex],
    /// Substrings of trigger phrases echoed on content lines.
    echo_fragments: &'static [&'static str],
    /// Whole lines that only repeat a heading.
    echo_lines: &'static [&'static str],
    boilerplate: &'static [&'static str],
    /// Continuation lines must be longer than this many characters.
    standalone_min_chars: usize,
    acceptance: Acceptance,
    /// Also scan continuation shapes paragraph by paragraph.
    rescan_paragraphs: bool,
    /// Drop lines after the trigger that match a trigger themselves.
    skip_trigger_lines: bool,
}

impl SectionRules {
    pub fn for_kind(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Goals => Self {
                kind,
                triggers: GOAL_TRIGGERS.as_slice(),
                echo_fragments: &[
                    "in today's session",
                    "in this session",
                    "today, you will",
                    "you will:",
                    "goals:",
                    "objectives:",
                    "session goals",
                    "learning goals",
                ],
                echo_lines: &["goals", "objectives", "session goals", "learning goals"],
                boilerplate: INSTRUCTION_BOILERPLATE,
                standalone_min_chars: 10,
                acceptance: Acceptance::ActionVerbs(GOAL_VERBS),
                rescan_paragraphs: true,
                skip_trigger_lines: false,
            },
            SectionKind::Assessments => Self {
                kind,
                triggers: ASSESSMENT_TRIGGERS.as_slice(),
                echo_fragments: &["review the list", "before continuing"],
                echo_lines: &[],
                boilerplate: ASSESSMENT_BOILERPLATE,
                standalone_min_chars: 10,
                acceptance: Acceptance::ActionVerbs(ASSESSMENT_VERBS),
                rescan_paragraphs: false,
                skip_trigger_lines: false,
            },
            SectionKind::Careers => Self {
                kind,
                triggers: CAREER_TRIGGERS.as_slice(),
                echo_fragments: &[],
                echo_lines: &["careers", "careers:", "related careers", "related careers:"],
                boilerplate: &[],
                standalone_min_chars: 0,
                acceptance: Acceptance::TitleLine { max_chars: 80 },
                rescan_paragraphs: false,
                skip_trigger_lines: true,
            },
            SectionKind::Materials => Self {
                kind,
                triggers: MATERIAL_TRIGGERS.as_slice(),
                echo_fragments: &["gather the following", "locate the following"],
                echo_lines: &[],
                boilerplate: &[],
                standalone_min_chars: 0,
                acceptance: Acceptance::ShortLine { max_chars: 120 },
                rescan_paragraphs: false,
                skip_trigger_lines: true,
            },
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// End offset of the first trigger (in pattern order) found in `text`.
    fn trigger_end(&self, text: &str) -> Option<usize> {
        self.triggers
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| m.end())
    }

    fn matches_trigger(&self, text: &str) -> bool {
        self.triggers.iter().any(|re| re.is_match(text))
    }

    /// Lines that repeat the trigger or carry instructions rather than content.
    fn is_echo(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.echo_fragments.iter().any(|f| lower.contains(f))
            || self.echo_lines.contains(&lower.trim())
            || self.boilerplate.iter().any(|b| lower.contains(b))
    }

    fn is_skipped_continuation(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        SKIP_TERMS.iter().any(|t| lower.contains(t)) || self.is_echo(line) || self.matches_trigger(line)
    }

    fn accepts(&self, line: &str) -> bool {
        if line.starts_with(BULLETS) || NUMBERED_LINE_REGEX.is_match(line) {
            return true;
        }
        match self.acceptance {
            Acceptance::ActionVerbs(verbs) => {
                let lower = line.to_lowercase();
                verbs.iter().any(|v| lower.contains(v))
            }
            Acceptance::TitleLine { max_chars } => {
                line.chars().count() <= max_chars
                    && line.chars().next().is_some_and(char::is_uppercase)
                    && !line.ends_with(':')
            }
            Acceptance::ShortLine { max_chars } => {
                line.chars().count() <= max_chars && !line.ends_with(':')
            }
        }
    }
}

/// Strip a numbered-list marker and leading bullets, preserving quantities.
pub fn clean_list_item(line: &str) -> String {
    let without_number = LIST_NUMBER_REGEX.replace(line, "");
    without_number.trim_start_matches(BULLETS).trim().to_string()
}

/// Extracts one section's items from a single slide.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    rules: SectionRules,
}

impl SectionExtractor {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            rules: SectionRules::for_kind(kind),
        }
    }

    pub fn goals() -> Self {
        Self::new(SectionKind::Goals)
    }

    pub fn assessments() -> Self {
        Self::new(SectionKind::Assessments)
    }

    pub fn careers() -> Self {
        Self::new(SectionKind::Careers)
    }

    pub fn materials() -> Self {
        Self::new(SectionKind::Materials)
    }

    pub fn kind(&self) -> SectionKind {
        self.rules.kind()
    }

    /// Items found on this slide, in order and without duplicates.
    ///
    /// Returns an empty list when no shape on the slide carries a trigger.
    pub fn extract(&self, slide: &Slide) -> Vec<String> {
        let shapes: Vec<(&TextFrame, String)> = slide
            .shape_texts()
            .filter(|(_, text)| !text.is_empty())
            .collect();

        if !shapes.iter().any(|(_, text)| self.rules.matches_trigger(text)) {
            return Vec::new();
        }
        log::debug!(
            "slide {}: {} trigger found",
            slide.number,
            self.rules.kind().label()
        );

        let mut items = Vec::new();
        for (frame, text) in &shapes {
            match self.rules.trigger_end(text) {
                Some(end) => self.extract_after_trigger(&text[end..], &mut items),
                None => self.extract_continuation(frame, text, &mut items),
            }
        }
        items
    }

    fn extract_after_trigger(&self, remainder: &str, items: &mut Vec<String>) {
        for line in remainder.trim().lines() {
            let line = line.trim();
            if line.chars().count() <= 3
                || self.rules.is_echo(line)
                || (self.rules.skip_trigger_lines && self.rules.matches_trigger(line))
            {
                continue;
            }
            push_unique(items, clean_list_item(line));
        }
    }

    fn extract_continuation(&self, frame: &TextFrame, text: &str, items: &mut Vec<String>) {
        for line in text.lines() {
            self.accept_continuation_line(line.trim(), items);
        }
        if self.rules.rescan_paragraphs {
            for paragraph in &frame.paragraphs {
                self.accept_continuation_line(paragraph.text.trim(), items);
            }
        }
    }

    fn accept_continuation_line(&self, line: &str, items: &mut Vec<String>) {
        if line.chars().count() <= self.rules.standalone_min_chars
            || line.is_empty()
            || self.rules.is_skipped_continuation(line)
            || !self.rules.accepts(line)
        {
            return;
        }
        push_unique(items, clean_list_item(line));
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !item.is_empty() && !items.contains(&item) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Paragraph, Shape};

    fn slide(texts: &[&str]) -> Slide {
        texts
            .iter()
            .fold(Slide::new(1), |slide, text| slide.with_shape(Shape::text(text)))
    }

    #[test]
    fn test_clean_list_item() {
        assert_eq!(clean_list_item("2. Wear goggles"), "Wear goggles");
        assert_eq!(clean_list_item("3) Measure the jar"), "Measure the jar");
        assert_eq!(clean_list_item("2 safety goggles"), "2 safety goggles");
        assert_eq!(clean_list_item("16 oz jar"), "16 oz jar");
        assert_eq!(clean_list_item("•◦ Nested bullet"), "Nested bullet");
        assert_eq!(clean_list_item("- - spaced"), "- spaced");
        assert_eq!(clean_list_item("1.5 liters of water"), "1.5 liters of water");
    }

    #[test]
    fn test_goals_after_trigger() {
        let s = slide(&["In today's session, you will:\n• Identify rock types\n• Explain erosion"]);
        assert_eq!(
            SectionExtractor::goals().extract(&s),
            vec!["Identify rock types", "Explain erosion"]
        );
    }

    #[test]
    fn test_no_trigger_no_items() {
        let s = slide(&["• Identify rock types\n• Explain erosion"]);
        for kind in SectionKind::ALL {
            assert!(SectionExtractor::new(kind).extract(&s).is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn test_goals_heading_must_stand_alone() {
        let s = slide(&["Goals\n• Identify rock types"]);
        assert!(SectionExtractor::goals().extract(&s).is_empty());

        let s = slide(&["Goals", "• Identify rock types\n• Explain erosion"]);
        assert_eq!(
            SectionExtractor::goals().extract(&s),
            vec!["Identify rock types", "Explain erosion"]
        );
    }

    #[test]
    fn test_goals_continuation_shape() {
        let s = slide(&[
            "Session Goals",
            "Students will describe the water cycle\nLab time\nInsert image of the water cycle here",
        ]);
        assert_eq!(
            SectionExtractor::goals().extract(&s),
            vec!["Students will describe the water cycle"]
        );
    }

    #[test]
    fn test_goals_paragraph_rescan() {
        let frame = TextFrame::new(vec![Paragraph::plain("Explore how\nrivers shape land")]);
        let s = Slide::new(2)
            .with_shape(Shape::text("Learning Goals"))
            .with_shape(Shape::with_text_frame(frame));
        assert_eq!(
            SectionExtractor::goals().extract(&s),
            vec!["Explore how", "Explore how\nrivers shape land"]
        );
    }

    #[test]
    fn test_goals_skip_instructions() {
        let s = slide(&[
            "Today, you will:\n• Build a model volcano\nNow that you have completed the module activity sheet, raise your hand.\nGoals",
        ]);
        assert_eq!(
            SectionExtractor::goals().extract(&s),
            vec!["Build a model volcano"]
        );
    }

    #[test]
    fn test_assessments_numbered_list() {
        let s = slide(&[
            "Your instructor will be evaluating you:\n1. Identify three rock types\n2) Describe erosion\nReview the list before continuing.",
        ]);
        assert_eq!(
            SectionExtractor::assessments().extract(&s),
            vec!["Identify three rock types", "Describe erosion"]
        );
    }

    #[test]
    fn test_assessments_continuation_shape() {
        let s = slide(&[
            "Assessment",
            "1 Explain how erosion shapes valleys\nWait quietly please\nFind the module activity sheet in your folder",
        ]);
        assert_eq!(
            SectionExtractor::assessments().extract(&s),
            vec!["1 Explain how erosion shapes valleys"]
        );
    }

    #[test]
    fn test_careers_in_trigger_shape() {
        let s = slide(&["Related Careers\n• Geologist\n• Hydrologist"]);
        assert_eq!(
            SectionExtractor::careers().extract(&s),
            vec!["Geologist", "Hydrologist"]
        );
    }

    #[test]
    fn test_careers_continuation_title_lines() {
        let s = slide(&[
            "Related Careers",
            "Geologist\nHydrologist\nsee more online:\nCopyright Example Learning",
        ]);
        assert_eq!(
            SectionExtractor::careers().extract(&s),
            vec!["Geologist", "Hydrologist"]
        );
    }

    #[test]
    fn test_materials_preserve_quantities() {
        let s = slide(&["Gather the following items:\n2 safety goggles\n2. Wear goggles"]);
        assert_eq!(
            SectionExtractor::materials().extract(&s),
            vec!["2 safety goggles", "Wear goggles"]
        );
    }

    #[test]
    fn test_materials_continuation_shape() {
        let s = slide(&["Locate the following", "Safety goggles\n16 oz jar\nProcedure:"]);
        assert_eq!(
            SectionExtractor::materials().extract(&s),
            vec!["Safety goggles", "16 oz jar"]
        );
    }

    #[test]
    fn test_careers_skip_lines_restating_trigger() {
        let s = slide(&["Related Careers\n• Geologist\nExplore more careers online"]);
        assert_eq!(SectionExtractor::careers().extract(&s), vec!["Geologist"]);
    }

    #[test]
    fn test_materials_skip_lines_restating_trigger() {
        let s = slide(&["Gather the following items:\n• Ruler\nLocate the scissors in the bin"]);
        assert_eq!(SectionExtractor::materials().extract(&s), vec!["Ruler"]);
    }

    #[test]
    fn test_items_deduplicated_within_slide() {
        let s = slide(&[
            "Gather the following items:\n• Ruler\n• Scissors",
            "• Ruler\n• Glue stick",
        ]);
        assert_eq!(
            SectionExtractor::materials().extract(&s),
            vec!["Ruler", "Scissors", "Glue stick"]
        );
    }

    #[test]
    fn test_frameless_and_empty_shapes_ignored() {
        let s = Slide::new(4)
            .with_shape(Shape::without_text())
            .with_shape(Shape::text(""))
            .with_shape(Shape::text("Related Careers\n• Park Ranger"));
        assert_eq!(SectionExtractor::careers().extract(&s), vec!["Park Ranger"]);
    }
}
