//! Question-answer record types

use serde::{Deserialize, Serialize};

/// A single extracted question-answer pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaPair {
    /// The question text
    pub question: String,
    /// The answer text
    pub answer: String,
    /// The chunk the pair was derived from; attached after interpretation
    #[serde(default)]
    pub source_chunk: String,
}

impl QaPair {
    /// Create a pair without source attribution
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            source_chunk: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_chunk_defaults_to_empty() {
        let raw = r#"{"question": "What is Rust?", "answer": "A systems language."}"#;
        let pair: QaPair = serde_json::from_str(raw).unwrap();
        assert_eq!(pair.question, "What is Rust?");
        assert!(pair.source_chunk.is_empty());
    }
}
