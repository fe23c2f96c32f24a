//! QA pair extraction pipeline

mod extractor;
mod interpreter;
mod prompt;

pub use extractor::QaExtractor;
pub use interpreter::interpret;
pub use prompt::{PromptBuilder, DEFAULT_PROMPT};
