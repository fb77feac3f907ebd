//! Text extraction: one capability, one adapter per note format.
//!
//! The orchestrator picks an adapter with [`extractor_for`] and from then on
//! only sees [`TextExtractor`]. Adapters are synchronous; async callers go
//! through [`extract_text`], which moves the work onto the blocking pool.

use crate::error::Note2AnkiError;
use crate::pipeline::docx::DocxExtractor;
use crate::pipeline::input::DocumentFormat;
use crate::pipeline::markdown::MarkdownExtractor;
use crate::pipeline::pdf::PdfExtractor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Produce plain text from a document on disk.
pub trait TextExtractor: Send + Sync {
    /// Extract the complete text of `path`.
    ///
    /// Adapters report their own failures as [`Note2AnkiError::Parse`]; the
    /// empty-content check is done once by [`extract_text_blocking`].
    fn extract(&self, path: &Path) -> Result<String, Note2AnkiError>;

    /// Human-readable adapter name for logs.
    fn name(&self) -> &'static str;
}

/// Pick the adapter for `format`.
///
/// `pdfium_lib_path` is only consulted for PDF input.
pub fn extractor_for(
    format: DocumentFormat,
    pdfium_lib_path: Option<&Path>,
) -> Box<dyn TextExtractor> {
    match format {
        DocumentFormat::Pdf => Box::new(PdfExtractor::new(pdfium_lib_path.map(Path::to_path_buf))),
        DocumentFormat::Docx => Box::new(DocxExtractor),
        DocumentFormat::Markdown => Box::new(MarkdownExtractor),
    }
}

/// Extract the text of `path` and reject whitespace-only results.
pub fn extract_text_blocking(
    path: &Path,
    format: DocumentFormat,
    pdfium_lib_path: Option<&Path>,
) -> Result<String, Note2AnkiError> {
    let extractor = extractor_for(format, pdfium_lib_path);
    info!("Extracting text with {} adapter", extractor.name());

    let text = extractor.extract(path)?;
    ensure_not_empty(path, text)
}

/// Async wrapper running [`extract_text_blocking`] on the blocking pool.
///
/// pdfium keeps thread-local state and zip/XML parsing is CPU-bound, so none
/// of the adapters belong on an async worker thread.
pub async fn extract_text(
    path: &Path,
    format: DocumentFormat,
    pdfium_lib_path: Option<&Path>,
) -> Result<String, Note2AnkiError> {
    let path = path.to_path_buf();
    let lib: Option<PathBuf> = pdfium_lib_path.map(Path::to_path_buf);

    tokio::task::spawn_blocking(move || extract_text_blocking(&path, format, lib.as_deref()))
        .await
        .map_err(|e| Note2AnkiError::Internal(format!("Extraction task panicked: {e}")))?
}

fn ensure_not_empty(path: &Path, text: String) -> Result<String, Note2AnkiError> {
    if text.trim().is_empty() {
        return Err(Note2AnkiError::EmptyContent {
            path: path.to_path_buf(),
        });
    }
    debug!("Extracted {} characters from {}", text.chars().count(), path.display());
    Ok(text)
}
