//! Error types for the note2anki library.
//!
//! Three layers, from outermost to innermost:
//!
//! * [`Note2AnkiError`] — **Fatal** for the run. Every stage (input,
//!   extraction, generation, export, configuration) reports through it and
//!   the run stops at the first one.
//!
//! * [`GenerationError`] — everything that can go wrong between sending the
//!   prompt and holding a parsed list of flashcards. Wrapped by
//!   [`Note2AnkiError::Generation`].
//!
//! * [`JsonExtractError`] — why a JSON array could not be isolated from the
//!   raw model text. Carried inside [`GenerationError::Extraction`] together
//!   with the raw text, so the operator can see what the model actually said.
//!
//! Per-page PDF failures are the only errors that never surface here; they are
//! logged and the page is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the note2anki library.
#[derive(Debug, Error)]
pub enum Note2AnkiError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input file extension is not one of pdf, docx, md, markdown.
    #[error("Unsupported file format: '{extension}'\nSupported input formats: .pdf, .docx, .md, .markdown")]
    UnsupportedFormat { extension: String },

    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The format adapter could not read the document.
    #[error("Failed to parse '{path}': {detail}")]
    Parse { path: PathBuf, detail: String },

    /// Extraction succeeded but produced only whitespace.
    #[error("No text content found in '{path}'")]
    EmptyContent { path: PathBuf },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// Card generation failed; see [`GenerationError`].
    #[error("Failed to generate flashcards: {0}")]
    Generation(#[from] GenerationError),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to export flashcards to '{path}': {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// The configuration file exists but could not be read or parsed.
    #[error("Invalid config file '{path}': {detail}")]
    ConfigRead { path: PathBuf, detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No credential in the config file or the environment.
    #[error("API key not found. Set {env_var} or provide \"api_key\" in the config file.")]
    MissingApiKey { env_var: &'static str },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure while turning document text into flashcards.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The completion call did not finish within the configured timeout.
    #[error("LLM request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Network-level failure (DNS, TLS, connection reset, unreadable body).
    #[error("LLM request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("LLM API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response contained no completion choices.
    #[error("no response from LLM")]
    NoResponse,

    /// No valid JSON array could be isolated from the model's text.
    #[error("failed to extract JSON from response: {source}\nActual response: {raw}")]
    Extraction {
        #[source]
        source: JsonExtractError,
        raw: String,
    },

    /// The JSON array was valid but its elements are not flashcards.
    #[error("failed to parse extracted JSON: {source}\nExtracted JSON: {json}\nActual response: {raw}")]
    Parse {
        #[source]
        source: serde_json::Error,
        json: String,
        raw: String,
    },

    /// A card came back with neither a front nor a back.
    #[error("flashcard {index} has an empty front and back\nExtracted JSON: {json}\nActual response: {raw}")]
    EmptyCard {
        index: usize,
        json: String,
        raw: String,
    },
}

/// Why a JSON array could not be located in a model response.
#[derive(Debug, Error)]
pub enum JsonExtractError {
    #[error("no JSON array found in response")]
    NoArrayFound,

    #[error("malformed JSON array in response")]
    MalformedArray,

    #[error("extracted content is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}
