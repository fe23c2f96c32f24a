//! Locating JSON-shaped spans inside surrounding prose

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid fence pattern"));

static NAIVE_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*?\}").expect("valid object pattern"));

static NAIVE_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*?\]").expect("valid array pattern"));

/// Contents of triple-backtick code blocks, optionally tagged `json`,
/// trimmed, in document order
pub fn fenced_blocks(text: &str) -> Vec<&str> {
    FENCED_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect()
}

/// Every balanced `{...}` and `[...]` span, longest first.
///
/// Depth matching starts at each opening delimiter, so nested structures
/// contribute one candidate per level. Longer spans are better recovery
/// candidates; the sort is stable, keeping object spans ahead of array
/// spans of equal length.
pub fn balanced_spans(text: &str) -> Vec<&str> {
    let mut spans = collect_balanced(text, b'{', b'}');
    spans.extend(collect_balanced(text, b'[', b']'));
    spans.sort_by(|a, b| b.len().cmp(&a.len()));
    spans
}

/// Shortest-match `{...}` spans followed by `[...]` spans. Cannot handle
/// nesting; kept as the last resort after balanced scanning.
pub fn naive_spans(text: &str) -> Vec<&str> {
    let mut spans: Vec<&str> = NAIVE_OBJECT.find_iter(text).map(|m| m.as_str()).collect();
    spans.extend(NAIVE_ARRAY.find_iter(text).map(|m| m.as_str()));
    spans
}

/// The first balanced `{...}` span, if any brace pair closes
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    balanced_span_at(text, start, b'{', b'}')
}

/// Balanced spans for one delimiter pair, one per opening position
fn collect_balanced(text: &str, open: u8, close: u8) -> Vec<&str> {
    let mut spans = Vec::new();
    for (pos, byte) in text.bytes().enumerate() {
        if byte == open {
            if let Some(span) = balanced_span_at(text, pos, open, close) {
                spans.push(span);
            }
        }
    }
    spans
}

/// Walk forward from an opening delimiter counting depth; the span ends
/// where depth returns to zero. Delimiters inside string literals are
/// counted too, mirroring a plain character scan; a candidate cut short
/// by that is simply rejected at parse time.
fn balanced_span_at(text: &str, start: usize, open: u8, close: u8) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(&text[start..start + offset + 1]);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_blocks_found_in_order() {
        let text = "a\n```json\n{\"x\": 1}\n```\nb\n```\n[2]\n```";
        assert_eq!(fenced_blocks(text), vec!["{\"x\": 1}", "[2]"]);
    }

    #[test]
    fn test_no_fences_no_blocks() {
        assert!(fenced_blocks("plain text with `single` ticks").is_empty());
    }

    #[test]
    fn test_balanced_spans_include_nested() {
        let spans = balanced_spans(r#"{"a": {"b": 1}}"#);
        assert_eq!(spans[0], r#"{"a": {"b": 1}}"#);
        assert!(spans.contains(&r#"{"b": 1}"#));
    }

    #[test]
    fn test_balanced_spans_sorted_longest_first() {
        let spans = balanced_spans("{} [1, 2, 3] {\"key\": 99}");
        assert_eq!(spans[0], "{\"key\": 99}");
        assert_eq!(spans[1], "[1, 2, 3]");
        assert_eq!(spans[2], "{}");
    }

    #[test]
    fn test_unclosed_openers_skipped() {
        let spans = balanced_spans(r#"{"a": {"b": 1}"#);
        assert_eq!(spans, vec![r#"{"b": 1}"#]);
    }

    #[test]
    fn test_first_balanced_object() {
        assert_eq!(
            first_balanced_object("x {\"a\": 1} y {\"b\": 2}"),
            Some("{\"a\": 1}")
        );
        assert_eq!(first_balanced_object("no braces"), None);
        assert_eq!(first_balanced_object("{unclosed"), None);
    }

    #[test]
    fn test_naive_spans_match_shortest() {
        let spans = naive_spans("{\"a\": 1} and [1, 2]");
        assert_eq!(spans, vec!["{\"a\": 1}", "[1, 2]"]);
    }

    #[test]
    fn test_multibyte_text_around_spans() {
        let spans = balanced_spans("前缀 {\"键\": \"值\"} 后缀");
        assert_eq!(spans, vec!["{\"键\": \"值\"}"]);
    }
}
