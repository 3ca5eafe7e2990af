use crate::error::HighlightError;
use regex::{Captures, Regex};

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Wrap every match of `pattern` in `<mark>` tags. An empty pattern is a no-op.
pub fn highlight(summary: &str, pattern: &str) -> Result<String, HighlightError> {
    if pattern.is_empty() {
        return Ok(summary.to_string());
    }
    let regex = Regex::new(pattern)?;
    let marked = regex.replace_all(summary, |caps: &Captures<'_>| {
        let found = &caps[0];
        if found.is_empty() {
            String::new()
        } else {
            format!("{MARK_OPEN}{found}{MARK_CLOSE}")
        }
    });
    Ok(marked.into_owned())
}
