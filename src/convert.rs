//! Pipeline orchestration: notes in, flashcards out.
//!
//! One run is strictly sequential: detect the format, extract the text, make
//! a single completion call, tag the cards, then either export them or hand
//! them back for preview. Any failure aborts the run; nothing is written
//! unless every earlier stage succeeded.

use crate::config::FlashcardConfig;
use crate::error::Note2AnkiError;
use crate::output::{ConversionOutput, ConversionStats, ExtractedDocument, Flashcard};
use crate::pipeline::{client, export, extract, input, llm};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Cards shown by [`format_preview`].
pub const PREVIEW_LIMIT: usize = 5;

/// Convert a note file into Anki flashcards.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — `.pdf`, `.docx`, `.md` or `.markdown` file
/// * `output` — destination; `.csv` selects CSV, anything else tab-separated
/// * `dry_run` — generate but do not write; `output` is left untouched
/// * `config` — model, credential and provider settings
///
/// # Errors
/// - [`Note2AnkiError::UnsupportedFormat`] before any file access
/// - file not found / permission denied / unparseable / empty notes
/// - any [`crate::error::GenerationError`] from the completion call
/// - [`Note2AnkiError::ExportFailed`] when the output cannot be written
pub async fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dry_run: bool,
    config: &FlashcardConfig,
) -> Result<ConversionOutput, Note2AnkiError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Starting conversion: {}", input.display());

    // ── Step 1: Format and input ─────────────────────────────────────────
    let format = input::DocumentFormat::from_path(input)?;
    let path = input::resolve_local(input)?;
    let subject = input::subject_from_path(&path);
    debug!("{} input, subject {:?}", format, subject);

    // ── Step 2: Provider ─────────────────────────────────────────────────
    let provider = client::resolve_provider(config)?;

    // ── Step 3: Extract text ─────────────────────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(&path);
    }
    let extract_start = Instant::now();
    let text = extract::extract_text(&path, format, config.pdfium_lib_path.as_deref()).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    let extracted_chars = text.chars().count();
    info!(
        "Extracted {} characters in {}ms",
        extracted_chars, extract_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(extracted_chars);
    }

    // ── Step 4: Generate cards ───────────────────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_start(&config.model);
    }
    let llm_start = Instant::now();
    let (mut flashcards, usage) =
        llm::generate_flashcards(provider.as_ref(), &text, &subject, config).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    let tag = input::subject_tag(&subject);
    if !tag.is_empty() {
        for card in &mut flashcards {
            card.add_tag(&tag);
        }
    }
    if let Some(ref cb) = config.progress_callback {
        cb.on_generation_complete(flashcards.len());
    }

    // ── Step 5: Export (unless dry run) ──────────────────────────────────
    let written_to = if dry_run {
        info!("Dry run: {} cards not written", flashcards.len());
        None
    } else {
        let format = export::export_to_file(&flashcards, output)?;
        debug!("Exported as {:?}", format);
        if let Some(ref cb) = config.progress_callback {
            cb.on_export_complete(output, flashcards.len());
        }
        Some(output.to_path_buf())
    };

    let stats = ConversionStats {
        extracted_chars,
        card_count: flashcards.len(),
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        extract_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} cards, {}ms total",
        stats.card_count, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        subject,
        flashcards,
        written_to,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dry_run: bool,
    config: &FlashcardConfig,
) -> Result<ConversionOutput, Note2AnkiError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Note2AnkiError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input, output, dry_run, config))
}

/// Extract the plain text of a note file without generating cards.
///
/// Does not require an API key.
pub async fn inspect(
    input: impl AsRef<Path>,
    pdfium_lib_path: Option<&Path>,
) -> Result<ExtractedDocument, Note2AnkiError> {
    let input = input.as_ref();
    let format = input::DocumentFormat::from_path(input)?;
    let path = input::resolve_local(input)?;
    let text = extract::extract_text(&path, format, pdfium_lib_path).await?;

    Ok(ExtractedDocument {
        format,
        subject: input::subject_from_path(&path),
        text,
    })
}

/// Render the first [`PREVIEW_LIMIT`] cards for a dry run.
///
/// Only front and back are shown; tags are omitted.
pub fn format_preview(cards: &[Flashcard]) -> String {
    let mut out = String::new();
    for (i, card) in cards.iter().take(PREVIEW_LIMIT).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "Card {}:", i + 1);
        let _ = writeln!(out, "  Front: {}", card.front);
        let _ = writeln!(out, "  Back: {}", card.back);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FlashcardConfig {
        FlashcardConfig::builder().api_key("k").build().unwrap()
    }

    #[test]
    fn preview_shows_front_and_back() {
        let cards = vec![Flashcard::new("What is DNA?", "Genetic material").with_tags(["bio"])];
        assert_eq!(
            format_preview(&cards),
            "Card 1:\n  Front: What is DNA?\n  Back: Genetic material\n"
        );
    }

    #[test]
    fn preview_caps_at_five_cards() {
        let cards: Vec<Flashcard> = (1..=8)
            .map(|i| Flashcard::new(format!("Q{i}"), format!("A{i}")))
            .collect();
        let preview = format_preview(&cards);
        assert!(preview.contains("Card 5:"));
        assert!(preview.contains("Front: Q5"));
        assert!(!preview.contains("Card 6:"));
        assert!(!preview.contains("Q6"));
    }

    #[test]
    fn preview_of_nothing_is_empty() {
        assert_eq!(format_preview(&[]), "");
    }

    #[tokio::test]
    async fn unsupported_format_fails_before_file_access() {
        // The file does not exist; the extension is rejected first.
        let err = convert("/no/such/notes.txt", "out.txt", true, &config())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Note2AnkiError::UnsupportedFormat { ref extension } if extension == "txt")
        );
    }

    #[tokio::test]
    async fn missing_input_is_file_not_found() {
        let err = convert("/no/such/notes.md", "out.txt", true, &config())
            .await
            .unwrap_err();
        assert!(matches!(err, Note2AnkiError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn inspect_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cell Biology.md");
        std::fs::write(&path, "# Mitosis\n\nCells **divide**.\n").unwrap();

        let doc = inspect(&path, None).await.unwrap();
        assert_eq!(doc.format, input::DocumentFormat::Markdown);
        assert_eq!(doc.subject, "Cell Biology");
        assert!(doc.text.contains("Mitosis"));
        assert!(doc.text.contains("Cells divide."));
        assert_eq!(doc.char_count(), doc.text.chars().count());
    }

    #[test]
    fn convert_sync_reports_errors() {
        let err = convert_sync("/no/such/notes.docx", "out.csv", false, &config()).unwrap_err();
        assert!(matches!(err, Note2AnkiError::FileNotFound { .. }));
    }
}
