//! # note2anki
//!
//! Turn study notes (PDF, DOCX, Markdown) into Anki flashcards with a single
//! LLM call.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notes file
//!  │
//!  ├─ 1. Input     pick the format from the extension, check the file
//!  ├─ 2. Extract   plain text (pdfium / word/document.xml / pulldown-cmark)
//!  ├─ 3. Generate  one chat-completion call with the whole text
//!  ├─ 4. Parse     cut the JSON array out of the reply, decode the cards
//!  └─ 5. Export    tab-separated (default) or CSV, or preview on a dry run
//! ```
//!
//! Every card is tagged with the subject, the input file name without its
//! extension.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use note2anki::{convert, FlashcardConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads .env, config.json and ANTHROPIC_API_KEY
//!     let config = FlashcardConfig::load(None)?;
//!     let output = convert("biology.md", "biology.txt", false, &config).await?;
//!     eprintln!("{} cards, {} tokens in / {} out",
//!         output.stats.card_count,
//!         output.stats.prompt_tokens,
//!         output.stats.completion_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `note2anki` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! note2anki = { version = "0.3", default-features = false }
//! ```
//!
//! ## PDF Support
//!
//! PDF text comes from pdfium, loaded at runtime. Point `PDFIUM_LIB_PATH` (or
//! `pdfium_lib_path` in the config file) at the library or its directory;
//! otherwise the system library search path is used.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FlashcardConfig, FlashcardConfigBuilder};
pub use convert::{convert, convert_sync, format_preview, inspect, PREVIEW_LIMIT};
pub use error::{GenerationError, JsonExtractError, Note2AnkiError};
pub use output::{ConversionOutput, ConversionStats, ExtractedDocument, Flashcard, TokenUsage};
pub use pipeline::client::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionProvider,
};
pub use pipeline::export::OutputFormat;
pub use pipeline::input::DocumentFormat;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
