//! Module acronym and default report naming.

/// Acronym used when a filename has no leading segment.
pub const UNKNOWN_ACRONYM: &str = "UNKN";

/// The module acronym of a deck filename: the part before the first
/// underscore, ignoring the extension.
///
/// `"GEOL_Session 1.pptx"` yields `"GEOL"`.
pub fn module_acronym(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    match stem.split('_').next() {
        Some(segment) if !segment.trim().is_empty() => segment.to_string(),
        _ => UNKNOWN_ACRONYM.to_string(),
    }
}

/// Default report filename for a module.
pub fn default_report_filename(acronym: &str) -> String {
    format!("{}_Doc Updates & Tickets.docx", acronym)
}
