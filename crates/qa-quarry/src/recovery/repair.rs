//! Single-shot structural repairs for near-JSON text

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::scan;

static UNQUOTED_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([{,])\s*([a-zA-Z0-9_]+)\s*:").expect("valid key pattern"));

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("valid comma pattern"));

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[^\n]*").expect("valid comment pattern"));

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment pattern"));

/// Try to repair near-JSON text and parse the result.
///
/// Each repair is derived from the original text and validated by a
/// parse attempt; the first candidate that parses wins. A composite
/// applying every normalization at once runs last, for output carrying
/// more than one fault.
pub fn repair_json(raw: &str) -> Option<Value> {
    repair_candidates(raw)
        .into_iter()
        .find_map(|candidate| serde_json::from_str(&candidate).ok())
}

/// Candidate repairs in the order they are attempted
fn repair_candidates(raw: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(stripped) = strip_preamble(raw) {
        candidates.push(stripped.to_string());
    }
    candidates.push(quote_keys(raw));
    candidates.push(raw.replace('\'', "\""));
    candidates.push(strip_trailing_commas(raw));
    candidates.push(strip_comments(raw));
    if let Some(span) = scan::first_balanced_object(raw) {
        candidates.push(span.to_string());
    }
    candidates.push(apply_all(raw));

    candidates
}

/// Drop prose before the first `{` or `[`
fn strip_preamble(raw: &str) -> Option<&str> {
    let start = match (raw.find('{'), raw.find('[')) {
        (Some(obj), Some(arr)) => obj.min(arr),
        (Some(obj), None) => obj,
        (None, Some(arr)) => arr,
        (None, None) => return None,
    };
    if start > 0 {
        Some(&raw[start..])
    } else {
        None
    }
}

/// Double-quote bare object keys
fn quote_keys(raw: &str) -> String {
    UNQUOTED_KEY.replace_all(raw, "${1}\"${2}\":").into_owned()
}

/// Remove commas dangling before a closing brace or bracket
fn strip_trailing_commas(raw: &str) -> String {
    TRAILING_COMMA.replace_all(raw, "$1").into_owned()
}

/// Remove `//` line comments and `/* */` block comments
fn strip_comments(raw: &str) -> String {
    let without_line = LINE_COMMENT.replace_all(raw, "");
    BLOCK_COMMENT.replace_all(&without_line, "").into_owned()
}

/// Every normalization applied together, on the preamble-stripped view.
/// Comments go first so commas they hid become strippable.
fn apply_all(raw: &str) -> String {
    let base = strip_preamble(raw).unwrap_or(raw);
    strip_trailing_commas(&quote_keys(&strip_comments(base)).replace('\'', "\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_keys_leaves_quoted_keys_alone() {
        assert_eq!(quote_keys(r#"{key: 1}"#), r#"{"key": 1}"#);
        assert_eq!(quote_keys(r#"{"key": 1}"#), r#"{"key": 1}"#);
        assert_eq!(
            quote_keys(r#"{a: 1, b_2: "x"}"#),
            r#"{"a": 1, "b_2": "x"}"#
        );
    }

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(strip_trailing_commas("[1, 2,]"), "[1, 2]");
        assert_eq!(strip_trailing_commas("{\"a\": 1, }"), "{\"a\": 1}");
        assert_eq!(strip_trailing_commas("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_strip_comments_keeps_newlines() {
        let cleaned = strip_comments("1 // one\n2 /* two\nlines */ 3");
        assert_eq!(cleaned, "1 \n2  3");
    }

    #[test]
    fn test_preamble_only_stripped_when_present() {
        assert_eq!(strip_preamble("text {\"a\": 1}"), Some("{\"a\": 1}"));
        assert_eq!(strip_preamble("{\"a\": 1}"), None);
        assert_eq!(strip_preamble("no json"), None);
    }

    #[test]
    fn test_earliest_delimiter_starts_the_slice() {
        assert_eq!(strip_preamble("x [1, {\"a\": 2}]"), Some("[1, {\"a\": 2}]"));
    }

    #[test]
    fn test_each_repair_validated_by_parse() {
        // broken beyond repair stays broken
        assert_eq!(repair_json("{{{"), None);
        assert_eq!(repair_json("key: value"), None);
    }

    #[test]
    fn test_composite_fixes_stacked_faults() {
        let value = repair_json("{q: 'one', // inline\nr: 'two',}").unwrap();
        assert_eq!(value, json!({"q": "one", "r": "two"}));
    }
}
