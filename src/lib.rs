//! # notes2book
//!
//! Restyle scanned or photographed academic notes into a structured,
//! textbook-quality document using a generative document model.
//!
//! ## Why this crate?
//!
//! OCR pipelines recover text but throw away meaning — a hand-drawn
//! comparison table comes out as word soup, a boxed definition as just
//! another sentence. Instead this crate sends the document itself to a
//! multimodal model with a fixed set of design rules and a declared output
//! schema, and gets back a typed structure (sections of paragraphs, lists,
//! tables, callouts, subheadings) that it lays out as a printable A4 PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Scan (PDF/PNG/JPEG/WebP)
//!  │
//!  ├─ 1. Input   resolve local file or download from URL, sniff media type
//!  ├─ 2. Encode  bytes → base64 inline payload
//!  ├─ 3. Model   one generateContent exchange with schema-enforced JSON
//!  ├─ 4. Parse   strict validation into a typed RedesignResult
//!  ├─ 5. Render  stateless projection into the print document
//!  └─ 6. Export  A4 PDF via genpdf (separate step, independent failure)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notes2book::{redesign, RedesignConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Key auto-detected from GEMINI_API_KEY / GOOGLE_API_KEY
//!     let config = RedesignConfig::default();
//!     let output = redesign("unit3_notes.pdf", &config).await?;
//!     println!("{}", output.result.title);
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.input_tokens,
//!         output.stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `notes2book` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! notes2book = { version = "0.3", default-features = false }
//! ```
//!
//! ## Export fonts
//!
//! The PDF facility loads a TrueType family from `RedesignConfig::font_dir`
//! (default `./fonts`, family `LiberationSans`). Place the regular, bold,
//! italic, and bold-italic `.ttf` files there before exporting; the
//! `--json` output needs no fonts at all.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod redesign;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RedesignConfig, RedesignConfigBuilder, DEFAULT_MODEL};
pub use error::{BlockError, RedesignError};
pub use model::{Block, RedesignResult, Section, SourceFile, ThemeColors};
pub use output::{RedesignOutput, RedesignStats};
pub use pipeline::client::{DesignModel, DesignRequest, DesignResponse, GeminiStudio};
pub use pipeline::export::{export_pdf, render_pdf_bytes, suggested_filename};
pub use pipeline::render::{render, DocumentHeader, Element, RedesignedDocument, RenderedSection};
pub use redesign::{redesign, redesign_from_source, redesign_sync, redesign_to_pdf};
