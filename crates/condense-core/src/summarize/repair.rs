use regex::Regex;
use std::sync::LazyLock;

static OPEN_BRACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{{2,}").expect("invalid open brace pattern"));
static CLOSE_BRACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}{2,}").expect("invalid close brace pattern"));

/// Patch a line that loosely resembles `{"key": "..."}` so it parses as JSON.
///
/// Targets what small models actually emit: doubled braces, array brackets
/// glued to the record, and trailing commas. The rewrites run in a fixed
/// order and later ones rely on the earlier ones.
pub fn repair_line(raw_line: &str) -> String {
    let mut line = raw_line.trim().to_string();

    line = OPEN_BRACE_RUN.replace_all(&line, "{").into_owned();
    line = CLOSE_BRACE_RUN.replace_all(&line, "}").into_owned();
    line = line.replace("\"\"}]", "\"}");
    line = line.replace("}]", "");
    if let Some(stripped) = line.strip_suffix("},") {
        line = stripped.to_string();
    }

    if !line.starts_with('{') {
        line.insert(0, '{');
    }
    if !line.ends_with('}') {
        line.push('}');
    }

    line = line.replace("\"\"}", "\"}");
    line = line.replace("}, }", "}");
    if let Some(stripped) = line.strip_suffix(']') {
        line = stripped.to_string();
    }
    line.replace("\"} }", "\"}")
}

#[cfg(test)]
mod tests {
    use super::repair_line;
    use serde_json::Value;

    fn key_of(line: &str) -> Option<String> {
        let value: Value = serde_json::from_str(line).ok()?;
        value.get("key")?.as_str().map(str::to_string)
    }

    #[test]
    fn adds_missing_braces() {
        let repaired = repair_line(r#""key": "hello""#);
        assert_eq!(repaired, r#"{"key": "hello"}"#);
        assert_eq!(key_of(&repaired).as_deref(), Some("hello"));
    }

    #[test]
    fn collapses_doubled_braces() {
        assert_eq!(repair_line(r#"{{"key": "a"}}"#), r#"{"key": "a"}"#);
        assert_eq!(repair_line(r#"{{{"key": "a"}}}"#), r#"{"key": "a"}"#);
    }

    #[test]
    fn strips_glued_array_closers() {
        assert_eq!(repair_line(r#"{"key": "a""}]"#), r#"{"key": "a"}"#);
        assert_eq!(repair_line(r#"{"key": "a"}]"#), r#"{"key": "a"}"#);
    }

    #[test]
    fn strips_trailing_comma_record() {
        assert_eq!(repair_line(r#"  {"key": "a"},  "#), r#"{"key": "a"}"#);
    }

    #[test]
    fn drops_duplicate_quote_before_brace() {
        assert_eq!(repair_line(r#"{"key": "a""}"#), r#"{"key": "a"}"#);
    }

    #[test]
    fn collapses_comma_before_closing_brace() {
        assert_eq!(repair_line(r#"{"key": "a"}, }"#), r#"{"key": "a"}"#);
    }

    #[test]
    fn collapses_spaced_double_close() {
        assert_eq!(repair_line(r#"{"key": "a"} }"#), r#"{"key": "a"}"#);
    }

    #[test]
    fn trailing_whitespace_after_comma_is_trimmed_first() {
        assert_eq!(repair_line("{\"key\": \"a\"},\t \r"), r#"{"key": "a"}"#);
    }

    #[test]
    fn leaves_clean_line_alone() {
        let line = r#"{"key": "Revenue grew 12% in Q3."}"#;
        assert_eq!(repair_line(line), line);
    }

    #[test]
    fn leading_array_bracket_still_unparseable() {
        let repaired = repair_line(r#"[{"key": "a"}"#);
        assert!(key_of(&repaired).is_none());
        assert!(repaired.contains(r#""key":"#));
    }
}
