//! Prompt assembly for extraction calls

/// Instruction used when the caller does not supply one
pub const DEFAULT_PROMPT: &str = "Extract question-answer pairs from the following text";

/// Full system message carrying the output format contract
const FULL_SYSTEM_PROMPT: &str = r#"You are an expert at generating question-answer pairs from documents.
Extract meaningful QA pairs from the provided document chunk.
Focus on key concepts, facts, and important details.

Return the QA pairs in the following JSON format:
[
    {
        "question": "The question based on the document content",
        "answer": "The answer to the question, based solely on the document"
    },
    ...
]

Guidelines:
1. Generate diverse questions covering different aspects of the content
2. Ensure questions are clear and answers are comprehensive
3. Include both factual and conceptual questions
4. Each answer must be directly supported by the document
5. Do not invent information that is not in the document"#;

/// Short system message for instructions that carry their own format rules
const SHORT_SYSTEM_PROMPT: &str =
    "You are an expert at generating question-answer pairs from documents.";

/// Builds the two chat messages sent for each chunk
pub struct PromptBuilder;

impl PromptBuilder {
    /// Pick the system message. An instruction that spells out its own
    /// JSON format gets the short form so the two do not conflict.
    pub fn system_prompt(instruction: &str) -> &'static str {
        if instruction.contains("JSON format") || instruction.contains("json format") {
            SHORT_SYSTEM_PROMPT
        } else {
            FULL_SYSTEM_PROMPT
        }
    }

    /// Join the instruction and the chunk, adding a colon to the
    /// instruction unless it already ends with one
    pub fn user_prompt(instruction: &str, chunk: &str) -> String {
        if instruction.trim().ends_with(':') {
            format!("{}\n\n{}", instruction, chunk)
        } else {
            format!("{}:\n\n{}", instruction, chunk)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instruction_gets_full_system_prompt() {
        let system = PromptBuilder::system_prompt(DEFAULT_PROMPT);
        assert!(system.contains("Guidelines"));
        assert!(system.contains("JSON format"));
    }

    #[test]
    fn test_format_aware_instruction_gets_short_system_prompt() {
        let system =
            PromptBuilder::system_prompt("Extract pairs in this JSON format: [...]");
        assert_eq!(system, SHORT_SYSTEM_PROMPT);

        let system = PromptBuilder::system_prompt("use the json format above");
        assert_eq!(system, SHORT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_user_prompt_appends_colon() {
        let prompt = PromptBuilder::user_prompt("Extract pairs", "the chunk");
        assert_eq!(prompt, "Extract pairs:\n\nthe chunk");
    }

    #[test]
    fn test_user_prompt_keeps_existing_colon() {
        let prompt = PromptBuilder::user_prompt("Extract pairs:", "the chunk");
        assert_eq!(prompt, "Extract pairs:\n\nthe chunk");

        // trailing whitespace after the colon still counts
        let prompt = PromptBuilder::user_prompt("Extract pairs:  ", "the chunk");
        assert_eq!(prompt, "Extract pairs:  \n\nthe chunk");
    }
}
