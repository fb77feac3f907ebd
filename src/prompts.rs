//! Prompts for flashcard generation.
//!
//! Every prompt lives here so that changing the model's instructions means
//! editing exactly one file, and so unit tests can inspect the prompts without
//! a live service.
//!
//! Callers can replace the system prompt via
//! [`crate::config::FlashcardConfig::system_prompt`]; the user prompt is
//! always built by [`user_prompt`].

/// Default system prompt, used when `FlashcardConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert educator creating Anki flashcards.
Follow these principles:
1. Create atomic cards (one concept per card)
2. Make questions clear and unambiguous
3. Keep answers concise but complete
4. Focus on key concepts, definitions, formulas, and relationships
5. Use active recall principles

CRITICAL: Respond ONLY with a valid JSON array. Do not include any explanatory text, introductions, or conclusions.
Output format: JSON array of objects with "front" (question) and "back" (answer) fields.
Generate comprehensive flashcards covering all important information."#;

/// Build the user message carrying the subject and the whole document text.
pub fn user_prompt(subject: &str, content: &str) -> String {
    format!(
        "Convert the following {subject} notes into Anki flashcards:\n\n\
         {content}\n\n\
         Create flashcards that cover all key concepts, ensuring each card tests a single piece of knowledge.\n\
         Output as a JSON array."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_demands_json_only() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("ONLY with a valid JSON array"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("\"front\""));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("\"back\""));
    }

    #[test]
    fn user_prompt_embeds_subject_and_content() {
        let p = user_prompt("biology", "Mitochondria produce ATP.");
        assert!(p.starts_with("Convert the following biology notes"));
        assert!(p.contains("\n\nMitochondria produce ATP.\n\n"));
        assert!(p.ends_with("Output as a JSON array."));
    }
}
