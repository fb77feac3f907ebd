//! Anki export: tab-separated text or CSV.
//!
//! The format follows the output path's extension: `.csv` gets CSV, anything
//! else gets tab-separated text, which is what Anki's "Import File" dialog
//! expects by default.
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! failed export never leaves a half-written deck behind.

use crate::error::Note2AnkiError;
use crate::output::Flashcard;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const CSV_HEADER: [&str; 3] = ["Front", "Back", "Tags"];

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `front<TAB>back[<TAB>tags]`, one card per line.
    Tsv,
    /// `Front,Back,Tags` header plus one quoted row per card.
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
            Some(ext) if ext == "csv" => Self::Csv,
            _ => Self::Tsv,
        }
    }
}

/// Write cards as tab-separated lines.
///
/// Tabs inside a field would shift the columns, so they become spaces. The
/// tag column is left off entirely for cards without tags.
pub fn write_tsv<W: Write>(cards: &[Flashcard], mut writer: W) -> io::Result<()> {
    for card in cards {
        let mut line = format!(
            "{}\t{}",
            card.front.replace('\t', " "),
            card.back.replace('\t', " ")
        );
        if !card.tags.is_empty() {
            line.push('\t');
            line.push_str(&card.joined_tags());
        }
        line.push('\n');
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()
}

/// Write cards as CSV with a `Front,Back,Tags` header, even for zero cards.
pub fn write_csv<W: Write>(cards: &[Flashcard], writer: W) -> io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for card in cards {
        csv.write_record([card.front.as_str(), card.back.as_str(), &card.joined_tags()])?;
    }
    csv.flush()
}

/// Write `cards` to `path` in the format its extension selects.
///
/// Creates missing parent directories and replaces an existing file.
pub fn export_to_file(cards: &[Flashcard], path: &Path) -> Result<OutputFormat, Note2AnkiError> {
    let format = OutputFormat::from_path(path);
    let export_err = |source: io::Error| Note2AnkiError::ExportFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(export_err)?;

    // Temp files default to 0600. A new deck gets the usual umask-derived
    // mode, a replaced deck keeps the mode it had.
    let existing = std::fs::metadata(path).ok().map(|m| m.permissions());
    let mut builder = tempfile::Builder::new();
    builder.prefix(".note2anki-").suffix(".tmp");
    #[cfg(unix)]
    if existing.is_none() {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp: NamedTempFile = builder.tempfile_in(dir).map_err(export_err)?;
    if let Some(perms) = existing {
        tmp.as_file().set_permissions(perms).map_err(export_err)?;
    }
    debug!("Writing {:?} export via {}", format, tmp.path().display());
    {
        let mut writer = BufWriter::new(&mut tmp);
        match format {
            OutputFormat::Tsv => write_tsv(cards, &mut writer),
            OutputFormat::Csv => write_csv(cards, &mut writer),
        }
        .map_err(export_err)?;
    }
    tmp.persist(path).map_err(|e| export_err(e.error))?;

    info!("Wrote {} flashcards to {}", cards.len(), path.display());
    Ok(format)
}
