//! Output types: the flashcard itself and the result of one conversion run.

use crate::pipeline::input::DocumentFormat;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// A single Anki flashcard.
///
/// Models are told to emit `front`/`back`, but `question`/`answer` are
/// accepted too since some models drift back to those names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(alias = "question")]
    pub front: String,
    #[serde(alias = "answer")]
    pub back: String,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
}

/// `"tags": null` reads as no tags.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Append `tag` unless the card already carries it.
    pub fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    /// Tags joined with single spaces, the way Anki expects them.
    pub fn joined_tags(&self) -> String {
        self.tags.join(" ")
    }
}

/// Token accounting reported by the completion service, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Timing and size figures for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Characters of plain text handed to the model.
    pub extracted_chars: usize,
    pub card_count: usize,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything a conversion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Label derived from the input file name. Attached to every card as a
    /// tag, with whitespace replaced by `_`.
    pub subject: String,
    pub flashcards: Vec<Flashcard>,
    /// Where the cards were written. `None` for a dry run.
    pub written_to: Option<PathBuf>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    pub fn is_dry_run(&self) -> bool {
        self.written_to.is_none()
    }
}

/// Plain text pulled from a note file, without any model involvement.
///
/// Returned by [`crate::convert::inspect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub format: DocumentFormat,
    pub subject: String,
    pub text: String,
}

impl ExtractedDocument {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_accepts_question_answer_aliases() {
        let card: Flashcard =
            serde_json::from_str(r#"{"question":"What is ATP?","answer":"Energy currency"}"#)
                .unwrap();
        assert_eq!(card.front, "What is ATP?");
        assert_eq!(card.back, "Energy currency");
        assert!(card.tags.is_empty());
    }

    #[test]
    fn null_tags_read_as_empty() {
        let card: Flashcard =
            serde_json::from_str(r#"{"front":"q","back":"a","tags":null}"#).unwrap();
        assert!(card.tags.is_empty());
    }

    #[test]
    fn add_tag_skips_duplicates() {
        let mut card = Flashcard::new("q", "a").with_tags(["cells"]);
        card.add_tag("biology");
        card.add_tag("cells");
        assert_eq!(card.tags, vec!["cells", "biology"]);
        assert_eq!(card.joined_tags(), "cells biology");
    }

    #[test]
    fn empty_tags_not_serialized() {
        let json = serde_json::to_string(&Flashcard::new("q", "a")).unwrap();
        assert_eq!(json, r#"{"front":"q","back":"a"}"#);
    }
}
