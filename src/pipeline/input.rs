//! Input resolution: pick the document format and validate the path.
//!
//! Format detection happens on the file name alone, before the file system is
//! touched, so an unsupported extension fails without any I/O. Only after a
//! format is known do we check that the file exists and can be opened.

use crate::error::Note2AnkiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported note formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Markdown,
}

impl DocumentFormat {
    /// Detect the format from the path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, Note2AnkiError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(Note2AnkiError::UnsupportedFormat { extension: ext }),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Markdown => "Markdown",
        })
    }
}

/// The subject label: the file name without its extension.
///
/// `notes/Cell Biology.md` → `Cell Biology`.
pub fn subject_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The subject as an Anki tag. Anki splits tags on whitespace, so runs of
/// whitespace become `_`: `Cell Biology` → `Cell_Biology`.
pub fn subject_tag(subject: &str) -> String {
    subject.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Check that a local file exists and is readable.
pub fn resolve_local(path: &Path) -> Result<PathBuf, Note2AnkiError> {
    if !path.exists() {
        return Err(Note2AnkiError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Check read permission by attempting to open; the handle drops right away.
    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Note2AnkiError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Note2AnkiError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved input: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_formats() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.pdf")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.DOCX")).unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("dir/a.md")).unwrap(),
            DocumentFormat::Markdown
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.Markdown")).unwrap(),
            DocumentFormat::Markdown
        );
    }

    #[test]
    fn rejects_unknown_extension_without_io() {
        // The file does not exist; detection must still fail on the extension.
        let err = DocumentFormat::from_path(Path::new("/no/such/dir/notes.rtf")).unwrap_err();
        match err {
            Note2AnkiError::UnsupportedFormat { extension } => assert_eq!(extension, "rtf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_extension() {
        let err = DocumentFormat::from_path(Path::new("README")).unwrap_err();
        assert!(matches!(err, Note2AnkiError::UnsupportedFormat { extension } if extension.is_empty()));
    }

    #[test]
    fn subject_strips_extension_only() {
        assert_eq!(subject_from_path(Path::new("biology.md")), "biology");
        assert_eq!(subject_from_path(Path::new("x/Cell Biology.PDF")), "Cell Biology");
        assert_eq!(subject_from_path(Path::new("ch1.v2.docx")), "ch1.v2");
    }

    #[test]
    fn subject_tag_has_no_whitespace() {
        assert_eq!(subject_tag("biology"), "biology");
        assert_eq!(subject_tag("Cell Biology"), "Cell_Biology");
        assert_eq!(subject_tag("  Week 3\tnotes "), "Week_3_notes");
        assert_eq!(subject_tag("ch1.v2"), "ch1.v2");
    }

    #[test]
    fn resolve_missing_file() {
        let err = resolve_local(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, Note2AnkiError::FileNotFound { .. }));
    }

    #[test]
    fn resolve_existing_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(resolve_local(f.path()).unwrap(), f.path());
    }
}
