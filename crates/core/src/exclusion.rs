//! Rejection of slide-template boilerplate posing as vocabulary.
//!
//! Session decks are built from a template whose headings ("Direct
//! Instruction", "Vocab Definition", "Gather", ...) are set in the same bold
//! blue as real vocabulary terms. Those headings must never be reported.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of anything that is not a lower-case letter or digit.
static NON_ALNUM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Substrings that mark a normalized phrase as template boilerplate.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "direct instruction",
    "procedure",
    "worksheet",
    "vocab definition",
    "activity lead in",
    "gather",
    "clean up",
    "summary",
    "goals",
    "assessment",
    "careers",
    "related careers",
    "materials",
    "session materials",
    "fa kc",
    "post test",
    "intro",
    "insert slide",
    "insert media",
    "insert layout",
    "objectives",
];

/// Normalized phrases excluded on exact match.
const PLACEHOLDER_PHRASES: &[&str] = &[
    "direct instruction",
    "procedure",
    "direct instruction procedure",
    "procedure safety",
    "vocab definition",
    "module guide",
    "assessment",
    "goals",
    "gather",
    "clean up",
    "summary",
    "fa kc",
    "activity lead in",
    "post test",
    "intro",
    "worksheet",
    "careers",
    "related careers",
    "materials",
    "session materials",
    "gather the following items",
    "gather the following item",
    "locate the following",
    "locate the",
    "insert slide type",
    "insert slide layout",
    "insert media description",
];

/// Leading words of template instructions.
const PLACEHOLDER_LEAD_WORDS: &[&str] = &[
    "insert",
    "post",
    "direct",
    "procedure",
    "vocab",
    "gather",
    "clean",
];

const PLACEHOLDER_SUFFIXES: &[&str] = &[" worksheet", " definition"];

/// Lower-case, collapse non-alphanumeric runs to a single space, trim.
pub fn normalize_phrase(text: &str) -> String {
    NON_ALNUM_REGEX
        .replace_all(&text.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Whether `text` must not be treated as a vocabulary term.
pub fn is_excluded_term(text: &str) -> bool {
    let raw = text.trim();
    let normalized = normalize_phrase(raw);

    if normalized.chars().count() <= 2 || raw.chars().count() <= 2 {
        return true;
    }
    if PLACEHOLDER_PATTERNS.iter().any(|p| normalized.contains(p)) {
        return true;
    }
    if PLACEHOLDER_PHRASES.contains(&normalized.as_str()) {
        return true;
    }
    if PLACEHOLDER_LEAD_WORDS
        .iter()
        .any(|word| normalized.strip_prefix(word).is_some_and(|rest| rest.starts_with(' ')))
    {
        return true;
    }
    if PLACEHOLDER_SUFFIXES.iter().any(|s| normalized.ends_with(s)) {
        return true;
    }

    raw.contains(',') && raw.split(',').all(is_placeholder_segment)
}

/// A comma-separated segment is boilerplate when it and some placeholder
/// pattern contain one another.
fn is_placeholder_segment(segment: &str) -> bool {
    let normalized = normalize_phrase(segment);
    PLACEHOLDER_PATTERNS
        .iter()
        .any(|p| normalized.contains(p) || p.contains(normalized.as_str()))
}
