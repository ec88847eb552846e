//! CLI binary for notes2book.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RedesignConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use notes2book::{
    export_pdf, redesign, suggested_filename, RedesignConfig, RedesignError, RedesignOutput,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Redesign a scanned unit and write <Title>_Redesign.pdf
  notes2book unit3_notes.pdf

  # Explicit output path
  notes2book scan.jpg -o stacks_and_queues.pdf

  # Structured JSON instead of a PDF (no fonts needed)
  notes2book unit3_notes.pdf --json > redesign.json

  # From a URL, with a specific model
  notes2book https://example.com/notes.pdf --model gemini-3-pro-preview

  # Custom design rules
  notes2book notes.pdf --system-instruction my_rules.txt

SUPPORTED SOURCES:
  PDF, PNG, JPEG, and WebP files — local paths or HTTP(S) URLs.
  The whole document goes to the model in one request; very large scans
  may be rejected by the service and are best split beforehand.

EXPORT FONTS:
  The PDF exporter loads a TrueType family from --font-dir (default
  ./fonts, family LiberationSans): the regular, bold, italic, and
  bold-italic .ttf files. --json output needs no fonts.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        Gemini API key (or GOOGLE_API_KEY)
  NOTES2BOOK_MODEL      Override the model id

SETUP:
  1. Get a key:   https://aistudio.google.com/apikey
  2. Export it:   export GEMINI_API_KEY=...
  3. Redesign:    notes2book unit3_notes.pdf
"#;

/// Restyle scanned academic notes into a textbook-quality PDF.
#[derive(Parser, Debug)]
#[command(
    name = "notes2book",
    version,
    about = "Restyle scanned academic notes into a textbook-quality PDF",
    long_about = "Send a scanned or photographed academic document (PDF or image) to a \
generative document model, receive a structured textbook-style redesign (sections, \
tables, callout boxes), and export it as a printable A4 PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file path (PDF, PNG, JPEG, WebP) or HTTP/HTTPS URL.
    input: String,

    /// Write the PDF to this path instead of deriving it from the title.
    #[arg(short, long, env = "NOTES2BOOK_OUTPUT")]
    output: Option<PathBuf>,

    /// Model id for the redesign request.
    #[arg(long, env = "NOTES2BOOK_MODEL")]
    model: Option<String>,

    /// API key; falls back to GEMINI_API_KEY / GOOGLE_API_KEY.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "NOTES2BOOK_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max tokens the model may generate.
    #[arg(long, env = "NOTES2BOOK_MAX_TOKENS", default_value_t = 16384)]
    max_tokens: u32,

    /// Per-request model timeout in seconds.
    #[arg(long, env = "NOTES2BOOK_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// HTTP download timeout for URL inputs in seconds.
    #[arg(long, env = "NOTES2BOOK_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Path to a text file containing a custom system instruction.
    #[arg(long, env = "NOTES2BOOK_SYSTEM_INSTRUCTION")]
    system_instruction: Option<PathBuf>,

    /// Directory containing the export font family (.ttf files).
    #[arg(long, env = "NOTES2BOOK_FONT_DIR", default_value = "fonts")]
    font_dir: String,

    /// Font family name for export.
    #[arg(long, env = "NOTES2BOOK_FONT_FAMILY", default_value = "LiberationSans")]
    font_family: String,

    /// Print the structured redesign as JSON instead of exporting a PDF.
    #[arg(long, env = "NOTES2BOOK_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "NOTES2BOOK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NOTES2BOOK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NOTES2BOOK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner and summary lines provide the feedback that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    let config = build_config(&cli).await?;

    // ── Run the redesign (one exchange; the spinner covers the wait) ─────
    let spinner = if show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Redesigning");
        bar.set_message(cli.input.clone());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let outcome = redesign(&cli.input, &config).await;

    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    let output = match outcome {
        Ok(output) => output,
        Err(e) if e.is_configuration() => {
            eprintln!("{} {e}", red("✘"));
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{} {e}", red("✘"));
            std::process::exit(1);
        }
    };

    report_redesign(&cli, &output);

    // ── JSON mode: print the structured result, no export ────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    // ── Export (independent step; the redesign above stays valid) ────────
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(suggested_filename(&output.result.title)));

    match export_pdf(&output.document, &config, &output_path) {
        Ok(()) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {}  {}",
                    green("✔"),
                    bold(&output_path.display().to_string()),
                    dim(&format!("{}ms total", output.stats.total_duration_ms)),
                );
            }
        }
        Err(e @ RedesignError::ExportFailed { .. })
        | Err(e @ RedesignError::OutputWriteFailed { .. }) => {
            eprintln!("{} {e}", red("✘"));
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Export failed"),
    }

    Ok(())
}

/// Per-redesign summary lines (skipped in quiet mode).
fn report_redesign(cli: &Cli, output: &RedesignOutput) {
    if cli.quiet || cli.json {
        return;
    }

    eprintln!(
        "{} {}  {}",
        cyan("◆"),
        bold(&output.result.title),
        dim(&format!(
            "{} sections, {} tokens in / {} out",
            output.result.sections.len(),
            output.stats.input_tokens,
            output.stats.output_tokens,
        )),
    );

    for issue in &output.document.issues {
        eprintln!("  {} {}", cyan("⚠"), issue);
    }
}

/// Map CLI args to `RedesignConfig`.
async fn build_config(cli: &Cli) -> Result<RedesignConfig> {
    let system_instruction = if let Some(path) = &cli.system_instruction {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system instruction from {path:?}"))?,
        )
    } else {
        None
    };

    let mut builder = RedesignConfig::builder()
        .temperature(cli.temperature)
        .max_output_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout)
        .font_dir(cli.font_dir.clone())
        .font_family(cli.font_family.clone());

    if let Some(model) = &cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(key) = &cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(instruction) = system_instruction {
        builder = builder.system_instruction(instruction);
    }

    builder.build().context("Invalid configuration")
}
