//! Subject extraction: pulls the note topic out of a free-text request.
//!
//! Heuristic only: looks for a trailing `for <X>` or `about <X>` (optionally
//! quoted). Anything else falls back to the template's placeholder.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::note::Subject;

static FOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)for ["']?([^"']+?)["']?$"#).expect("valid regex"));
static ABOUT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)about ["']?([^"']+?)["']?$"#).expect("valid regex"));

/// Extracts the subject from `raw_text`, trying `for <X>` before `about <X>`.
/// Returns `placeholder` when neither pattern yields a non-blank subject.
pub fn extract_subject(raw_text: &str, placeholder: &'static str) -> Subject {
    [&*FOR_PATTERN, &*ABOUT_PATTERN]
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(raw_text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| Subject::new(m.as_str()))
        })
        .unwrap_or_else(|| Subject::placeholder(placeholder))
}
