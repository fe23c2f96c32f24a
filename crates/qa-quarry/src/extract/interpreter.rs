//! Shape normalization for model responses

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::recovery::recover;
use crate::types::QaPair;

/// Wrapper keys models like to put around the pair array, in the order
/// they are checked
const WRAPPER_KEYS: [&str; 4] = ["qa", "qa_pairs", "qas", "pairs"];

static PAIR_FALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""question":\s*"([^"]*)",\s*"answer":\s*"([^"]*)""#)
        .expect("valid fallback pattern")
});

/// Interpret raw model output as a list of QA pairs.
///
/// Accepts a bare array of pairs, an object wrapping the array under a
/// known key, or a single pair object. When no JSON can be recovered at
/// all, question/answer fields are scraped from the raw text by regex.
/// Never fails; unusable output yields an empty list.
pub fn interpret(response: &str) -> Vec<QaPair> {
    match recover(response) {
        Some(value) => normalize(value),
        None => scrape_pairs(response),
    }
}

fn normalize(value: Value) -> Vec<QaPair> {
    match value {
        Value::Array(items) => collect_pairs(items),
        Value::Object(map) => {
            for key in WRAPPER_KEYS {
                if let Some(Value::Array(items)) = map.get(key) {
                    return collect_pairs(items.clone());
                }
            }
            if map.contains_key("question") && map.contains_key("answer") {
                return collect_pairs(vec![Value::Object(map)]);
            }
            tracing::warn!("recovered JSON is not a QA pair shape");
            Vec::new()
        }
        other => {
            tracing::warn!("recovered JSON is not a QA pair shape: {}", other);
            Vec::new()
        }
    }
}

/// Deserialize each element, dropping ones that are not a QA pair
fn collect_pairs(items: Vec<Value>) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    for item in items {
        match serde_json::from_value::<QaPair>(item) {
            Ok(pair) => pairs.push(pair),
            Err(e) => {
                tracing::warn!("dropping element that is not a QA pair: {}", e);
            }
        }
    }
    pairs
}

/// Last-resort extraction of question/answer field pairs from text no
/// recovery stage could parse
fn scrape_pairs(response: &str) -> Vec<QaPair> {
    let pairs: Vec<QaPair> = PAIR_FALLBACK
        .captures_iter(response)
        .map(|caps| QaPair::new(&caps[1], &caps[2]))
        .collect();

    if pairs.is_empty() {
        tracing::error!("no QA pairs could be scraped from response");
    } else {
        tracing::warn!(
            "scraped {} QA pairs from unparseable response",
            pairs.len()
        );
    }
    pairs
}
