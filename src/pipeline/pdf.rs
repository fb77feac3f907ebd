//! PDF adapter: per-page text extraction via pdfium.
//!
//! Pages are visited in order. A page that pdfium cannot load or whose text
//! layer cannot be read is logged and skipped, so one damaged page does not
//! cost the whole document. Pages with no text (scans, blank separators) are
//! skipped silently. Failing to open the document at all is fatal.

use crate::error::Note2AnkiError;
use crate::pipeline::extract::TextExtractor;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct PdfExtractor {
    /// Library file or directory containing it. `None` → system search path.
    lib_path: Option<PathBuf>,
}

impl PdfExtractor {
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    fn bind(&self) -> Result<Pdfium, PdfiumError> {
        let bindings = match &self.lib_path {
            Some(p) if p.is_dir() => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(p))?
            }
            Some(p) => Pdfium::bind_to_library(p)?,
            None => Pdfium::bind_to_system_library()?,
        };
        Ok(Pdfium::new(bindings))
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, Note2AnkiError> {
        let pdfium = self.bind().map_err(|e| Note2AnkiError::Parse {
            path: path.to_path_buf(),
            detail: format!(
                "failed to bind to pdfium library: {e:?}\n\
                 Set PDFIUM_LIB_PATH or \"pdfium_lib_path\" in the config file."
            ),
        })?;

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Note2AnkiError::Parse {
                path: path.to_path_buf(),
                detail: format!("failed to open PDF: {e:?}"),
            })?;

        let pages = document.pages();
        let total = pages.len();
        info!("PDF loaded: {} pages", total);

        let page_texts = (0..total).map(|idx| -> Result<String, String> {
            let page = pages.get(idx).map_err(|e| format!("{e:?}"))?;
            let text = page.text().map_err(|e| format!("{e:?}"))?;
            Ok(text.all())
        });

        Ok(join_page_texts(page_texts))
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

/// Concatenate per-page results in order, each followed by a newline.
///
/// `Err` pages are logged and skipped; whitespace-only pages are skipped.
pub fn join_page_texts<I>(pages: I) -> String
where
    I: IntoIterator<Item = Result<String, String>>,
{
    let mut buf = String::new();

    for (idx, page) in pages.into_iter().enumerate() {
        match page {
            Ok(text) if text.trim().is_empty() => {
                debug!("Page {}: no extractable text, skipping", idx + 1);
            }
            Ok(text) => {
                buf.push_str(&text);
                buf.push('\n');
            }
            Err(detail) => {
                warn!("Page {}: text extraction failed, skipping — {}", idx + 1, detail);
            }
        }
    }

    buf
}
