//! Pipeline stages for notes-to-flashcards conversion.
//!
//! Each submodule implements one step, so each can be tested on its own and
//! the extraction backends can change without touching generation or export.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm ──▶ response ──▶ export
//! (format)  (pdf/docx/md)  (1 call)  (JSON array)  (TSV/CSV)
//! ```
//!
//! 1. [`input`]    — detect the format from the extension, check the file
//! 2. [`extract`]  — plain text via [`pdf`], [`docx`] or [`markdown`]; runs in
//!    `spawn_blocking` because pdfium and zip parsing are blocking
//! 3. [`llm`]      — build the prompt and make the single completion call
//!    through a [`client::CompletionProvider`]; the only stage with network I/O
//! 4. [`response`] — cut the JSON array out of the reply and parse the cards
//! 5. [`export`]   — write Anki-importable TSV or CSV

pub mod client;
pub mod docx;
pub mod export;
pub mod extract;
pub mod input;
pub mod llm;
pub mod markdown;
pub mod pdf;
pub mod response;
