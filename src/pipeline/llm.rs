//! Card generation: one prompt, one completion, one parsed card list.
//!
//! All prompt wording lives in [`crate::prompts`]; this module only assembles
//! the request, bounds the call with the configured timeout, and hands the
//! reply to [`crate::pipeline::response`]. There is no retry: a failed call
//! fails the run.

use crate::config::FlashcardConfig;
use crate::error::GenerationError;
use crate::output::{Flashcard, TokenUsage};
use crate::pipeline::client::{ChatCompletionRequest, ChatMessage, CompletionProvider};
use crate::pipeline::response::flashcards_from_response;
use crate::prompts::user_prompt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Generate flashcards for `content` under the label `subject`.
///
/// ## Message Layout
///
/// 1. **System message** — card-writing rules (or the configured override)
/// 2. **User message** — subject and the full extracted text
pub async fn generate_flashcards(
    provider: &dyn CompletionProvider,
    content: &str,
    subject: &str,
    config: &FlashcardConfig,
) -> Result<(Vec<Flashcard>, TokenUsage), GenerationError> {
    let request = build_request(content, subject, config);
    let limit = Duration::from_secs(config.api_timeout_secs);

    info!(
        "Requesting flashcards from {} ({} chars of notes)",
        config.model,
        content.len()
    );
    let start = Instant::now();

    let response = tokio::time::timeout(limit, provider.complete(&request))
        .await
        .map_err(|_| GenerationError::Timeout {
            secs: config.api_timeout_secs,
        })??;

    let usage = response
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();
    debug!(
        "{} input tokens, {} output tokens, {:?}",
        usage.prompt_tokens,
        usage.completion_tokens,
        start.elapsed()
    );

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(GenerationError::NoResponse)?;
    let raw = choice.message.content.unwrap_or_default();

    let cards = flashcards_from_response(&raw)?;
    info!("Model returned {} flashcards", cards.len());

    Ok((cards, usage))
}

/// Assemble the chat request from the config and the document.
pub fn build_request(content: &str, subject: &str, config: &FlashcardConfig) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage::system(config.effective_system_prompt()),
            ChatMessage::user(user_prompt(subject, content)),
        ],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
