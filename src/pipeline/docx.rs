//! DOCX adapter: read `word/document.xml` out of the zip and keep the text.
//!
//! Only the main document part is read; headers, footers, comments and
//! footnotes live in other parts and are ignored. Inside the body, text runs
//! (`<w:t>`) are concatenated in document order, each paragraph ends with a
//! newline, and run-level `<w:tab/>` / `<w:br/>` map to `\t` / `\n`.

use crate::error::Note2AnkiError;
use crate::pipeline::extract::TextExtractor;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path) -> Result<String, Note2AnkiError> {
        let parse_err = |detail: String| Note2AnkiError::Parse {
            path: path.to_path_buf(),
            detail,
        };

        let file = File::open(path).map_err(|e| parse_err(format!("failed to read DOCX: {e}")))?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| parse_err(format!("failed to read DOCX: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| parse_err(format!("missing {DOCUMENT_PART}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| parse_err(format!("failed to read {DOCUMENT_PART}: {e}")))?;

        document_xml_to_text(&xml).map_err(|e| parse_err(format!("XML parse error: {e}")))
    }

    fn name(&self) -> &'static str {
        "docx"
    }
}

/// Pull the body text out of a WordprocessingML main document part.
pub fn document_xml_to_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();

    let mut in_body = false;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"body" => in_body = true,
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"body" => in_body = false,
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" if in_body => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) if in_body => match e.local_name().as_ref() {
                b"p" => out.push('\n'),
                b"tab" if in_run => out.push('\t'),
                b"br" | b"cr" if in_run => out.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_body && in_text => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                out.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
