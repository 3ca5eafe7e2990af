use regex::Regex;
use std::sync::LazyLock;

/// `[00:01:02.003 --> 00:01:05.000]`, hours optional on each side.
static RANGE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(?:\d{2}:)?\d{2}:\d{2}\.\d{3}\s*-->\s*(?:\d{2}:)?\d{2}:\d{2}\.\d{3}\s*\]")
        .expect("invalid range timestamp pattern")
});

/// `(27:16)`, `(1:02:03)` or `(01:02:03)`.
static PAREN_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?:\d{1,2}:)?\d{2}:\d{2}\)")
        .expect("invalid paren timestamp pattern")
});

/// First range timestamp, then first parenthesized timestamp, verbatim.
pub fn extract_anchors(chunk_text: &str) -> Vec<String> {
    [&*RANGE_TIMESTAMP, &*PAREN_TIMESTAMP]
        .into_iter()
        .filter_map(|pattern| pattern.find(chunk_text))
        .map(|found| found.as_str().to_string())
        .collect()
}
