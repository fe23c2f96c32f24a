//! JSON recovery from messy LLM output
//!
//! Chat models rarely return clean JSON: answers arrive wrapped in prose,
//! inside fenced code blocks, with unquoted keys or trailing commas. This
//! module digs a parseable value out of such text through an ordered chain
//! of strategies, each a pure function from text to an optional value.

mod repair;
mod scan;

pub use repair::repair_json;

use serde_json::Value;

/// Recovery strategies in the order they are attempted
const STAGES: &[(&str, fn(&str) -> Option<Value>)] = &[
    ("strict", parse_strict),
    ("repair", repair_json),
    ("fenced", parse_fenced_blocks),
    ("balanced", parse_balanced_spans),
    ("naive", parse_naive_spans),
];

/// Recover a JSON value from raw model output.
///
/// Tries, in order: a strict parse; single-shot structural repairs;
/// fenced code blocks; balanced brace and bracket spans, longest first;
/// and finally naive shortest-span matching. Returns `None` when no
/// strategy produces a parseable value.
pub fn recover(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        tracing::warn!("cannot recover JSON from empty response");
        return None;
    }

    for (name, stage) in STAGES {
        if let Some(value) = stage(raw) {
            tracing::debug!("JSON recovered at stage '{}'", name);
            return Some(value);
        }
    }

    let preview: String = raw.chars().take(200).collect();
    tracing::warn!("could not recover JSON from response: {}", preview);
    None
}

fn parse_strict(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok()
}

fn parse_fenced_blocks(raw: &str) -> Option<Value> {
    scan::fenced_blocks(raw)
        .into_iter()
        .find_map(parse_or_repair)
}

fn parse_balanced_spans(raw: &str) -> Option<Value> {
    scan::balanced_spans(raw)
        .into_iter()
        .find_map(parse_or_repair)
}

fn parse_naive_spans(raw: &str) -> Option<Value> {
    scan::naive_spans(raw).into_iter().find_map(parse_or_repair)
}

fn parse_or_repair(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate)
        .ok()
        .or_else(|| repair_json(candidate))
}
