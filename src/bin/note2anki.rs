//! CLI binary for note2anki.
//!
//! A thin shim over the library crate that maps CLI flags onto
//! `FlashcardConfig` and prints results.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use note2anki::pipeline::input::{resolve_local, DocumentFormat};
use note2anki::{
    convert, format_preview, inspect, ConversionProgressCallback, FlashcardConfig,
    ProgressCallback, PREVIEW_LIMIT,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one spinner for the running stage, one log line per
/// finished stage printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Stop the spinner; safe to call whether the run succeeded or not.
    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, input: &Path) {
        self.bar.set_prefix("Extracting");
        self.bar.set_message(input.display().to_string());
    }

    fn on_extraction_complete(&self, chars: usize) {
        self.bar.println(format!(
            "  {} Extracted {} of text",
            green("✓"),
            bold(&format!("{chars} characters"))
        ));
    }

    fn on_generation_start(&self, model: &str) {
        self.bar.set_prefix("Generating");
        self.bar.set_message(format!("flashcards with {model}…"));
    }

    fn on_generation_complete(&self, card_count: usize) {
        self.bar.println(format!(
            "  {} Generated {}",
            green("✓"),
            bold(&format!("{card_count} flashcards"))
        ));
        self.bar.set_prefix("Saving");
        self.bar.set_message("");
    }

    fn on_export_complete(&self, output: &Path, card_count: usize) {
        self.bar.println(format!(
            "  {} Saved {} flashcards to {}",
            green("✓"),
            card_count,
            bold(&output.display().to_string())
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Tab-separated output (Anki's default import format)
  note2anki notes.pdf flashcards.txt

  # CSV output with a Front,Back,Tags header
  note2anki lecture.docx flashcards.csv

  # Preview the first 5 cards without writing anything
  note2anki --dry-run biology.md preview.txt

  # Show the text that would be sent to the model (no API key needed)
  note2anki --extract-only notes.pdf

SUPPORTED FORMATS:
  Input:   .pdf, .docx, .md, .markdown
  Output:  .csv → CSV, anything else → tab-separated

CONFIG FILE (JSON, default ./config.json):
  api_key, model, max_tokens, temperature, system_prompt,
  base_url, api_timeout_secs, pdfium_lib_path

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY   API key; overrides the config file
  PDFIUM_LIB_PATH     pdfium library (or its directory) for PDF input
  RUST_LOG            Override log filtering

  A .env file in the working directory is loaded first.
"#;

/// Convert study notes into Anki flashcards with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "note2anki",
    version,
    about = "Convert study notes (PDF, DOCX, Markdown) into Anki flashcards",
    long_about = "Extract the text of a PDF, DOCX or Markdown file, ask an LLM to turn it into \
atomic question/answer flashcards, and write them as an Anki-importable TSV or CSV file. Every \
card is tagged with the input file name.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Notes file: .pdf, .docx, .md or .markdown.
    input: Option<PathBuf>,

    /// Output file: .csv for CSV, anything else for tab-separated.
    output: Option<PathBuf>,

    /// JSON configuration file. Default: ./config.json when present.
    #[arg(short, long, env = "NOTE2ANKI_CONFIG")]
    config: Option<PathBuf>,

    /// Preview the first cards instead of writing the output file.
    #[arg(long)]
    dry_run: bool,

    /// Model ID, overriding the config file.
    #[arg(long, env = "NOTE2ANKI_MODEL")]
    model: Option<String>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "NOTE2ANKI_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the extracted text only, no generation.
    #[arg(long)]
    extract_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "NOTE2ANKI_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NOTE2ANKI_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, env = "NOTE2ANKI_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so `env = ...` arguments can come from .env as well.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the stage feedback; INFO logs would tear it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.extract_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Arguments ────────────────────────────────────────────────────────
    let Some(input) = cli.input.clone() else {
        return print_help();
    };

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let doc = inspect(&input, cli.pdfium_lib.as_deref())
            .await
            .with_context(|| format!("Failed to extract text from {}", input.display()))?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(doc.text.as_bytes())
            .context("Failed to write to stdout")?;
        if !doc.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        if !cli.quiet {
            eprintln!(
                "{} {} characters from {} ({})",
                dim("·"),
                doc.char_count(),
                doc.format,
                doc.subject
            );
        }
        return Ok(());
    }

    let Some(output) = cli.output.clone() else {
        return print_help();
    };

    // Fail on a bad input path before complaining about configuration.
    DocumentFormat::from_path(&input)?;
    resolve_local(&input).context("Input file check failed")?;

    // ── Build config ─────────────────────────────────────────────────────
    let spinner = if show_progress {
        Some(CliProgressCallback::new())
    } else {
        None
    };
    let progress_cb: Option<ProgressCallback> = spinner
        .as_ref()
        .map(|cb| Arc::clone(cb) as Arc<dyn ConversionProgressCallback>);

    let config = match build_config(&cli, progress_cb).await {
        Ok(config) => config,
        Err(e) => {
            if let Some(ref s) = spinner {
                s.finish();
            }
            return Err(e);
        }
    };

    // ── Run conversion ───────────────────────────────────────────────────
    let result = convert(&input, &output, cli.dry_run, &config).await;
    if let Some(ref s) = spinner {
        s.finish();
    }
    let result = result.context("Processing failed")?;

    if cli.dry_run {
        println!(
            "{}",
            bold(&format!("Preview (first {PREVIEW_LIMIT} cards):"))
        );
        println!();
        print!("{}", format_preview(&result.flashcards));
        if result.flashcards.len() > PREVIEW_LIMIT && !cli.quiet {
            eprintln!(
                "\n{}",
                dim(&format!(
                    "… {} more not shown",
                    result.flashcards.len() - PREVIEW_LIMIT
                ))
            );
        }
    }

    if !cli.quiet {
        let target = match result.written_to {
            Some(ref path) => bold(&path.display().to_string()),
            None => cyan("dry run, nothing written"),
        };
        eprintln!(
            "{}  {} flashcards  {}ms  →  {}",
            green("✔"),
            result.stats.card_count,
            result.stats.total_duration_ms,
            target,
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&result.stats.prompt_tokens.to_string()),
            dim(&result.stats.completion_tokens.to_string()),
        );
    }

    Ok(())
}

/// Usage without an error exit: missing arguments are not a failure.
fn print_help() -> Result<()> {
    Cli::command()
        .print_help()
        .context("Failed to print help")?;
    Ok(())
}

/// Load the config file and environment, then apply CLI overrides.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<FlashcardConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut config =
        FlashcardConfig::load(cli.config.as_deref()).context("Configuration error")?;

    if let Some(ref model) = cli.model {
        anyhow::ensure!(!model.trim().is_empty(), "--model must not be empty");
        config.model = model.clone();
    }
    if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
        config.system_prompt = Some(prompt);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        config.pdfium_lib_path = Some(lib.clone());
    }
    config.progress_callback = progress;

    Ok(config)
}
