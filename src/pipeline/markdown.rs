//! Markdown adapter: render to HTML, then strip the tags.
//!
//! The strip is a single linear scan with an "inside tag" flag: `<` opens a
//! tag, `>` closes it, everything else outside a tag is kept. It is lossy
//! (a literal `<` in prose would swallow text up to the next `>`, but the
//! renderer escapes those to `&lt;`) and keeps whitespace exactly as rendered.
//! Entities are decoded afterwards so `&amp;` reads as `&` on the card.

use crate::error::Note2AnkiError;
use crate::pipeline::extract::TextExtractor;
use pulldown_cmark::{html, Options, Parser};
use std::path::Path;

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, path: &Path) -> Result<String, Note2AnkiError> {
        let source = std::fs::read_to_string(path).map_err(|e| Note2AnkiError::Parse {
            path: path.to_path_buf(),
            detail: format!("failed to read markdown file: {e}"),
        })?;
        Ok(markdown_to_text(&source))
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}

/// Render Markdown to plain text.
pub fn markdown_to_text(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, parser);

    html_escape::decode_html_entities(&strip_tags(&rendered)).into_owned()
}

/// Drop every `<...>` span from `html`.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_tags_keeps_text_between_tags() {
        assert_eq!(strip_tags("<p>Hello <em>world</em></p>\n"), "Hello world\n");
    }

    #[test]
    fn strip_tags_drops_attributes() {
        assert_eq!(
            strip_tags(r#"<a href="https://x.org">link</a>"#),
            "link"
        );
    }

    #[test]
    fn strip_tags_does_not_reflow_whitespace() {
        assert_eq!(strip_tags("<li>a</li>\n\n<li>  b</li>"), "a\n\n  b");
    }

    #[test]
    fn headings_lists_and_emphasis() {
        let text = markdown_to_text("# Krebs cycle\n\n- **Input:** acetyl-CoA\n- Output: CO2\n");
        assert!(text.contains("Krebs cycle\n"));
        assert!(text.contains("Input: acetyl-CoA"));
        assert!(text.contains("Output: CO2"));
        assert!(!text.contains('<'));
        assert!(!text.contains('*'));
    }

    #[test]
    fn entities_are_decoded() {
        let text = markdown_to_text("Salt & pepper, 2 < 3, \"quoted\"");
        assert_eq!(text.trim(), "Salt & pepper, 2 < 3, \"quoted\"");
    }

    #[test]
    fn code_blocks_keep_content() {
        let text = markdown_to_text("```rust\nfn main() {}\n```\n");
        assert_eq!(text.trim_end(), "fn main() {}");
    }

    #[test]
    fn missing_file_is_parse_error() {
        let err = MarkdownExtractor
            .extract(Path::new("/no/such/notes.md"))
            .unwrap_err();
        assert!(matches!(err, Note2AnkiError::Parse { .. }));
    }
}
